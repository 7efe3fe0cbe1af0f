//! PDF text and image extraction using lopdf and pdf-extract.

use image::{DynamicImage, GrayImage, RgbImage};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, trace};

use super::{PdfProcessor, Result};
use crate::error::PdfError;

/// PDF reader built on lopdf.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
}

/// Text layer of a single page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfPage {
    /// Page number (1-indexed).
    pub number: u32,
    pub text: String,
}

impl PdfExtractor {
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
        }
    }

    /// Load a PDF from bytes into a new extractor.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut extractor = Self::new();
        extractor.load(data)?;
        Ok(extractor)
    }

    /// Per-page text layer for every page.
    ///
    /// Pages whose text cannot be decoded come back empty.
    pub fn pages(&self) -> Vec<PdfPage> {
        (1..=self.page_count())
            .map(|number| PdfPage {
                number,
                text: self.extract_page_text(number).unwrap_or_default(),
            })
            .collect()
    }

    fn document(&self) -> Result<&Document> {
        self.document
            .as_ref()
            .ok_or_else(|| PdfError::Parse("no document loaded".to_string()))
    }

    /// Every image XObject in the document, in object order.
    fn document_images(&self, doc: &Document) -> Vec<DynamicImage> {
        let images: Vec<DynamicImage> = doc
            .objects
            .values()
            .filter_map(|object| decode_image(doc, object))
            .collect();
        debug!("Found {} images in document", images.len());
        images
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract reads bytes, so keep the decrypted form.
            let mut decrypted = Vec::new();
            doc.save_to(&mut decrypted)
                .map_err(|e| PdfError::Parse(format!("failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_text(&self) -> Result<String> {
        self.document()?;
        match pdf_extract::extract_text_from_mem(&self.raw_data) {
            Ok(text) => Ok(text),
            Err(e) => {
                // Fonts pdf-extract cannot map often still decode page by page.
                debug!("pdf-extract failed ({}), joining lopdf page text", e);
                let pages = self.pages();
                if pages.iter().all(|p| p.text.trim().is_empty()) {
                    return Err(PdfError::TextExtraction(e.to_string()));
                }
                Ok(pages
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
        }
    }

    fn extract_page_text(&self, page: u32) -> Result<String> {
        let doc = self.document()?;
        if !doc.get_pages().contains_key(&page) {
            return Err(PdfError::InvalidPage(page));
        }
        doc.extract_text(&[page])
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }

    fn page_images(&self, page: u32) -> Result<Vec<DynamicImage>> {
        let doc = self.document()?;
        let page_id = *doc
            .get_pages()
            .get(&page)
            .ok_or(PdfError::InvalidPage(page))?;

        let mut images = Vec::new();
        if let Some(resources) = page_resources(doc, page_id) {
            if let Ok(xobjects) = resources.get(b"XObject") {
                if let Ok((_, Object::Dictionary(xobjects))) = doc.dereference(xobjects) {
                    for (_, reference) in xobjects.iter() {
                        if let Ok((_, object)) = doc.dereference(reference) {
                            images.extend(decode_image(doc, object));
                        }
                    }
                }
            }
        }

        // Scanners sometimes emit images that are not wired into page resources.
        if images.is_empty() && doc.get_pages().len() == 1 {
            debug!("No XObject images on page {}, scanning all objects", page);
            images = self.document_images(doc);
        }

        debug!("Extracted {} images from page {}", images.len(), page);
        Ok(images)
    }
}

/// Resources dictionary for a page, walking up the page tree for inherited ones.
fn page_resources(doc: &Document, node_id: ObjectId) -> Option<Dictionary> {
    let Ok(Object::Dictionary(node)) = doc.get_object(node_id) else {
        return None;
    };

    if let Ok(resources) = node.get(b"Resources") {
        if let Ok((_, Object::Dictionary(resources))) = doc.dereference(resources) {
            return Some(resources.clone());
        }
    }

    match node.get(b"Parent") {
        Ok(Object::Reference(parent_id)) => page_resources(doc, *parent_id),
        _ => None,
    }
}

fn decode_image(doc: &Document, object: &Object) -> Option<DynamicImage> {
    let Object::Stream(stream) = object else {
        return None;
    };
    let dict = &stream.dict;

    if dict.get(b"Subtype").ok()?.as_name().ok()? != b"Image" {
        return None;
    }

    let width = dict.get(b"Width").ok()?.as_i64().ok()? as u32;
    let height = dict.get(b"Height").ok()?.as_i64().ok()? as u32;
    trace!("Found image object: {}x{}", width, height);

    let filter = dict.get(b"Filter").ok().and_then(|filter| match filter {
        Object::Name(name) => Some(name.as_slice()),
        Object::Array(filters) => filters.first().and_then(|o| o.as_name().ok()),
        _ => None,
    });

    match filter {
        Some(b"DCTDecode") => {
            return image::load_from_memory_with_format(&stream.content, image::ImageFormat::Jpeg)
                .ok();
        }
        Some(b"JPXDecode") | Some(b"CCITTFaxDecode") | Some(b"JBIG2Decode") => {
            trace!("Skipping unsupported image filter");
            return None;
        }
        _ => {}
    }

    let bits = dict
        .get(b"BitsPerComponent")
        .ok()
        .and_then(|o| o.as_i64().ok())
        .unwrap_or(8);
    if bits != 8 {
        trace!("Unsupported bits per component: {}", bits);
        return None;
    }

    let color_space = dict
        .get(b"ColorSpace")
        .ok()
        .and_then(|o| match o {
            Object::Name(name) => Some(name.as_slice()),
            Object::Array(items) => items.first().and_then(|o| o.as_name().ok()),
            Object::Reference(r) => doc.get_object(*r).ok().and_then(|o| o.as_name().ok()),
            _ => None,
        })
        .unwrap_or(b"DeviceRGB");

    let data = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());
    raw_to_image(data, width, height, color_space)
}

fn raw_to_image(
    mut data: Vec<u8>,
    width: u32,
    height: u32,
    color_space: &[u8],
) -> Option<DynamicImage> {
    let pixels = (width as usize) * (height as usize);
    match color_space {
        b"DeviceRGB" | b"RGB" if data.len() >= pixels * 3 => {
            data.truncate(pixels * 3);
            RgbImage::from_raw(width, height, data).map(DynamicImage::ImageRgb8)
        }
        b"DeviceGray" | b"G" if data.len() >= pixels => {
            data.truncate(pixels);
            GrayImage::from_raw(width, height, data).map(DynamicImage::ImageLuma8)
        }
        _ => {
            trace!(
                "Could not decode {} byte image as {}",
                data.len(),
                String::from_utf8_lossy(color_space)
            );
            None
        }
    }
}
