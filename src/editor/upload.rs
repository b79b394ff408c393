//! Image uploads into document slots.

use super::{EditorError, EditorSession, form};
use crate::{
    client::ContentRemote,
    content::{GalleryItem, SectionName},
};
use std::path::Path;

/// Where an uploaded image lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSlot {
    HeroImage,
    AboutImage,
    HeaderLogo,
    /// The image of the package draft in the open modal.
    PackageImage,
    /// A new gallery item appended with this caption.
    GalleryItem { caption: String },
}

impl ImageSlot {
    /// Form field previewing the slot, for single-image slots.
    pub const fn field_id(&self) -> Option<&'static str> {
        match self {
            ImageSlot::HeroImage => Some("hero-image"),
            ImageSlot::AboutImage => Some("about-image"),
            ImageSlot::HeaderLogo => Some("header-logo"),
            ImageSlot::PackageImage | ImageSlot::GalleryItem { .. } => None,
        }
    }

    const fn section(&self) -> Option<SectionName> {
        match self {
            ImageSlot::HeroImage => Some(SectionName::Hero),
            ImageSlot::AboutImage => Some(SectionName::About),
            ImageSlot::HeaderLogo => Some(SectionName::Header),
            ImageSlot::GalleryItem { .. } => Some(SectionName::Gallery),
            ImageSlot::PackageImage => None,
        }
    }
}

impl EditorSession {
    /// Upload `file` and point `slot` at the returned URL.
    ///
    /// The target is checked before the upload starts. On failure the document
    /// is left untouched.
    pub fn upload_image(
        &mut self,
        remote: &dyn ContentRemote,
        slot: ImageSlot,
        file: &Path,
    ) -> Result<String, EditorError> {
        if let Some(section) = slot.section()
            && !self.document.has_section(section)
        {
            return Err(EditorError::SectionMissing(section));
        }
        if slot == ImageSlot::PackageImage && self.modal.is_none() {
            return Err(EditorError::NoModal);
        }

        let url = remote.upload_image(file)?;

        match slot {
            ImageSlot::PackageImage => {
                if let Some(modal) = self.modal.as_mut() {
                    modal.draft.image = url.clone();
                }
            }
            ImageSlot::GalleryItem { caption } => {
                if let Some(gallery) = self.document.gallery.as_mut() {
                    gallery.items.push(GalleryItem {
                        image: url.clone(),
                        caption,
                        ..Default::default()
                    });
                }
            }
            single => {
                if let Some(spec) = single.field_id().and_then(form::lookup) {
                    spec.set(&mut self.document, url.clone());
                    // Keep the preview in step so a later collect does not revert it
                    self.form.set(spec.id, url.clone());
                }
            }
        }

        Ok(url)
    }
}
