//! PDF document access
//!
//! Opens, inspects and rewrites page boxes through `lopdf`. The cropper only
//! sees the [`PageDocument`] trait.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::{Document, Object, ObjectId};
use thiserror::Error;

use crate::margin::PageRect;

/// Page tree depth limit when looking up inherited attributes
const MAX_PARENT_DEPTH: usize = 32;

/// Document error types
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to open {path}: {message}")]
    Open { path: String, message: String },

    #[error("Failed to save {path}: {message}")]
    Save { path: String, message: String },

    #[error("Page {0} not found")]
    PageNotFound(u32),

    #[error("Invalid MediaBox on page {page}: {message}")]
    InvalidBox { page: u32, message: String },

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
}

pub type Result<T> = std::result::Result<T, DocumentError>;

/// Page-level view of a document that the cropper mutates
pub trait PageDocument {
    /// Number of pages
    fn page_count(&self) -> u32;

    /// Current visible-area rectangle of 1-based `page`
    fn media_box(&self, page: u32) -> Result<PageRect>;

    /// Replace the visible-area rectangle of 1-based `page`
    fn set_media_box(&mut self, page: u32, rect: &PageRect) -> Result<()>;
}

/// `lopdf`-backed PDF document
pub struct PdfDocument {
    inner: Document,
    /// 1-based page number to page object, built once on load
    pages: BTreeMap<u32, ObjectId>,
}

impl PdfDocument {
    /// Load a PDF from disk
    pub fn open(path: &Path) -> Result<Self> {
        let inner = Document::load(path).map_err(|e| DocumentError::Open {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::from_document(inner))
    }

    /// Wrap an already loaded document
    pub fn from_document(inner: Document) -> Self {
        let pages = inner.get_pages();
        Self { inner, pages }
    }

    /// Write the whole document to `path`
    pub fn save(&mut self, path: &Path) -> Result<()> {
        self.inner
            .save(path)
            .map(|_| ())
            .map_err(|e| DocumentError::Save {
                path: path.display().to_string(),
                message: e.to_string(),
            })
    }

    pub fn inner(&self) -> &Document {
        &self.inner
    }

    fn page_id(&self, page: u32) -> Result<ObjectId> {
        self.pages
            .get(&page)
            .copied()
            .ok_or(DocumentError::PageNotFound(page))
    }

    /// Find `/MediaBox` on the page or the nearest ancestor that has one
    fn inherited_media_box(&self, page: u32, page_id: ObjectId) -> Result<&Object> {
        let mut node_id = page_id;
        for _ in 0..MAX_PARENT_DEPTH {
            let node = self.inner.get_object(node_id)?.as_dict()?;
            match node.get(b"MediaBox") {
                Ok(Object::Reference(id)) => return Ok(self.inner.get_object(*id)?),
                Ok(media_box) => return Ok(media_box),
                Err(_) => {}
            }
            match node.get(b"Parent") {
                Ok(Object::Reference(parent_id)) => node_id = *parent_id,
                _ => break,
            }
        }
        Err(DocumentError::InvalidBox {
            page,
            message: "no MediaBox on page or its ancestors".to_string(),
        })
    }
}

fn number(object: &Object) -> Option<f64> {
    match object {
        Object::Integer(value) => Some(*value as f64),
        Object::Real(value) => Some(f64::from(*value)),
        _ => None,
    }
}

/// Parse a 4-number box array, normalising swapped corners
fn rect_from_array(page: u32, object: &Object) -> Result<PageRect> {
    let invalid = |message: String| DocumentError::InvalidBox { page, message };

    let array = object
        .as_array()
        .map_err(|_| invalid("expected array".to_string()))?;
    if array.len() != 4 {
        return Err(invalid(format!("expected 4 numbers, got {}", array.len())));
    }

    let mut values = [0.0f64; 4];
    for (slot, item) in values.iter_mut().zip(array) {
        *slot = number(item).ok_or_else(|| invalid("non-numeric entry".to_string()))?;
    }

    let [a, b, c, d] = values;
    Ok(PageRect::new(a.min(c), b.min(d), a.max(c), b.max(d)))
}

impl PageDocument for PdfDocument {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn media_box(&self, page: u32) -> Result<PageRect> {
        let page_id = self.page_id(page)?;
        let media_box = self.inherited_media_box(page, page_id)?;
        rect_from_array(page, media_box)
    }

    fn set_media_box(&mut self, page: u32, rect: &PageRect) -> Result<()> {
        let page_id = self.page_id(page)?;
        let array: Vec<Object> = [rect.x1, rect.y1, rect.x2, rect.y2]
            .iter()
            .map(|&v| Object::Real(v as f32))
            .collect();

        self.inner
            .get_object_mut(page_id)?
            .as_dict_mut()?
            .set("MediaBox", array);
        Ok(())
    }
}
