//! Admin editor session.
//!
//! An [`EditorSession`] owns one loaded document and everything the admin
//! edits around it:
//!
//! - the active section and the populated form fields
//! - stable keys for the about "values" list
//! - at most one open package modal
//!
//! Nothing is sent anywhere until [`EditorSession::save`], which collects the
//! form into the document and pushes the whole document through a
//! [`ContentRemote`].

mod form;
mod keyed;
mod modal;
mod upload;

pub use form::{fields_of, lookup};
pub use keyed::ValueKey;
pub use modal::{ModalMode, PackageDraft, PackageModal};
pub use upload::ImageSlot;

use crate::{
    client::{ClientError, ContentRemote},
    content::{
        AboutValue, Document, GalleryItem, Package, PackagesSection, SectionName,
        generate_package_id,
    },
};
use form::Form;
use keyed::KeyedList;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("unknown field `{0}`")]
    UnknownField(String),

    #[error("field `{0}` is not populated, select its section first")]
    NotPopulated(String),

    #[error("section `{0}` is missing from the document")]
    SectionMissing(SectionName),

    #[error("a package is already being edited")]
    ModalOpen,

    #[error("no package is being edited")]
    NoModal,

    #[error("package `{0}` not found")]
    PackageNotFound(String),

    #[error("value {0} not found")]
    ValueNotFound(ValueKey),

    #[error("gallery item {0} not found")]
    GalleryItemNotFound(usize),

    #[error("Título e Preço são obrigatórios (missing: {})", .0.join(", "))]
    Validation(Vec<&'static str>),

    #[error(transparent)]
    Remote(#[from] ClientError),
}

/// Which field of an about value to edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueField {
    Title,
    Desc,
}

#[derive(Debug)]
pub struct EditorSession {
    document: Document,
    active: Option<SectionName>,
    form: Form,
    values: KeyedList,
    modal: Option<PackageModal>,
}

impl EditorSession {
    pub fn new(document: Document) -> Self {
        let mut values = KeyedList::default();
        values.populate(document.about.as_ref().map_or(0, |a| a.values.len()));
        Self {
            document,
            active: None,
            form: Form::default(),
            values,
            modal: None,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn active(&self) -> Option<SectionName> {
        self.active
    }

    // ------------------------------------------------------------------------
    // Sections and form
    // ------------------------------------------------------------------------

    /// Make `section` the active one and populate its fields from the document.
    ///
    /// A section absent from the document becomes active with nothing populated.
    pub fn select(&mut self, section: SectionName) {
        self.active = Some(section);
        self.form.populate(&self.document, section);
        if section == SectionName::About {
            self.values
                .populate(self.document.about.as_ref().map_or(0, |a| a.values.len()));
        }
    }

    /// Current form value of a populated field.
    pub fn field(&self, id: &str) -> Option<&str> {
        self.form.get(id)
    }

    pub fn set_field(&mut self, id: &str, value: impl Into<String>) -> Result<(), EditorError> {
        let spec = lookup(id).ok_or_else(|| EditorError::UnknownField(id.to_owned()))?;
        if !self.document.has_section(spec.section) {
            return Err(EditorError::SectionMissing(spec.section));
        }
        if self.form.set(spec.id, value.into()) {
            Ok(())
        } else {
            Err(EditorError::NotPopulated(id.to_owned()))
        }
    }

    /// Write every populated field into the document.
    pub fn collect(&mut self) {
        self.form.collect(&mut self.document);
    }

    /// Collect the form and push the whole document.
    pub fn save(&mut self, remote: &dyn ContentRemote) -> Result<Value, EditorError> {
        self.collect();
        Ok(remote.save(&self.document)?)
    }

    // ------------------------------------------------------------------------
    // Package modal
    // ------------------------------------------------------------------------

    pub fn modal(&self) -> Option<&PackageModal> {
        self.modal.as_ref()
    }

    pub fn open_add_package(&mut self) -> Result<&mut PackageDraft, EditorError> {
        if self.modal.is_some() {
            return Err(EditorError::ModalOpen);
        }
        Ok(&mut self.modal.insert(PackageModal::add()).draft)
    }

    pub fn open_edit_package(&mut self, id: &str) -> Result<&mut PackageDraft, EditorError> {
        if self.modal.is_some() {
            return Err(EditorError::ModalOpen);
        }
        let pkg = self
            .document
            .find_package(id)
            .ok_or_else(|| EditorError::PackageNotFound(id.to_owned()))?;
        Ok(&mut self.modal.insert(PackageModal::edit(pkg)).draft)
    }

    pub fn draft_mut(&mut self) -> Result<&mut PackageDraft, EditorError> {
        self.modal
            .as_mut()
            .map(|modal| &mut modal.draft)
            .ok_or(EditorError::NoModal)
    }

    /// Commit the draft and close the modal, returning the package id.
    ///
    /// Adding appends with a fresh id; editing replaces the entry in place.
    /// When validation fails the modal stays open with the draft intact.
    pub fn confirm_package(&mut self) -> Result<String, EditorError> {
        let modal = self.modal.as_ref().ok_or(EditorError::NoModal)?;

        let missing = modal.draft.missing_required();
        if !missing.is_empty() {
            return Err(EditorError::Validation(missing));
        }

        if let ModalMode::Edit(id) = &modal.mode
            && self.document.find_package(id).is_none()
        {
            return Err(EditorError::PackageNotFound(id.clone()));
        }

        let Some(PackageModal { mode, draft }) = self.modal.take() else {
            return Err(EditorError::NoModal);
        };
        let items = &mut self
            .document
            .packages
            .get_or_insert_with(PackagesSection::default)
            .items;

        match mode {
            ModalMode::Add => {
                let id = generate_package_id(items);
                items.push(draft.apply(Package {
                    id: id.clone(),
                    ..Default::default()
                }));
                Ok(id)
            }
            ModalMode::Edit(id) => {
                // Presence was checked above
                if let Some(slot) = items.iter_mut().find(|p| p.id == id) {
                    *slot = draft.apply(std::mem::take(slot));
                }
                Ok(id)
            }
        }
    }

    /// Discard the draft. Returns whether a modal was open.
    pub fn cancel_package(&mut self) -> bool {
        self.modal.take().is_some()
    }

    pub fn remove_package(&mut self, id: &str) -> Result<Package, EditorError> {
        let items = self
            .document
            .packages
            .as_mut()
            .map(|p| &mut p.items)
            .ok_or_else(|| EditorError::PackageNotFound(id.to_owned()))?;
        let index = items
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| EditorError::PackageNotFound(id.to_owned()))?;
        Ok(items.remove(index))
    }

    // ------------------------------------------------------------------------
    // About values
    // ------------------------------------------------------------------------

    pub fn value_keys(&self) -> &[ValueKey] {
        self.values.keys()
    }

    fn about_values(&mut self) -> Result<&mut Vec<AboutValue>, EditorError> {
        self.document
            .about
            .as_mut()
            .map(|about| &mut about.values)
            .ok_or(EditorError::SectionMissing(SectionName::About))
    }

    /// Edit one field of a value; the change lands in the document immediately.
    pub fn update_value(
        &mut self,
        key: ValueKey,
        field: ValueField,
        text: impl Into<String>,
    ) -> Result<(), EditorError> {
        let index = self
            .values
            .position(key)
            .ok_or(EditorError::ValueNotFound(key))?;
        let value = self
            .about_values()?
            .get_mut(index)
            .ok_or(EditorError::ValueNotFound(key))?;
        match field {
            ValueField::Title => value.title = text.into(),
            ValueField::Desc => value.desc = text.into(),
        }
        Ok(())
    }

    /// Append an empty value and return its key.
    pub fn add_value(&mut self) -> Result<ValueKey, EditorError> {
        self.about_values()?.push(AboutValue::default());
        Ok(self.values.push())
    }

    pub fn remove_value(&mut self, key: ValueKey) -> Result<AboutValue, EditorError> {
        let index = self
            .values
            .position(key)
            .ok_or(EditorError::ValueNotFound(key))?;
        let values = self.about_values()?;
        if index >= values.len() {
            return Err(EditorError::ValueNotFound(key));
        }
        let removed = values.remove(index);
        self.values.remove(key);
        Ok(removed)
    }

    // ------------------------------------------------------------------------
    // Gallery
    // ------------------------------------------------------------------------

    pub fn remove_gallery_item(&mut self, index: usize) -> Result<GalleryItem, EditorError> {
        let gallery = self
            .document
            .gallery
            .as_mut()
            .ok_or(EditorError::SectionMissing(SectionName::Gallery))?;
        if index >= gallery.items.len() {
            return Err(EditorError::GalleryItemNotFound(index));
        }
        Ok(gallery.items.remove(index))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        cell::RefCell,
        collections::HashSet,
        path::{Path, PathBuf},
    };

    /// Records calls and answers uploads with a canned result.
    #[derive(Default)]
    struct FakeRemote {
        saved: RefCell<Vec<Document>>,
        uploads: RefCell<Vec<PathBuf>>,
        fail_uploads: bool,
    }

    impl FakeRemote {
        fn failing() -> Self {
            Self {
                fail_uploads: true,
                ..Default::default()
            }
        }
    }

    impl ContentRemote for FakeRemote {
        fn save(&self, document: &Document) -> Result<Value, ClientError> {
            self.saved.borrow_mut().push(document.clone());
            Ok(Value::Null)
        }

        fn upload_image(&self, file: &Path) -> Result<String, ClientError> {
            self.uploads.borrow_mut().push(file.to_path_buf());
            if self.fail_uploads {
                Err(ClientError::UploadFailed("Arquivo inválido".into()))
            } else {
                Ok(format!("https://cdn.example.com/{}", file.display()))
            }
        }
    }

    fn sample() -> Document {
        Document::from_json(include_str!("../embed/content-data.json")).unwrap()
    }

    fn session() -> EditorSession {
        EditorSession::new(sample())
    }

    fn ids(session: &EditorSession) -> Vec<String> {
        session
            .document()
            .package_items()
            .iter()
            .map(|p| p.id.clone())
            .collect()
    }

    #[test]
    fn test_select_populates_only_that_section() {
        let mut s = session();
        s.select(SectionName::Hero);

        assert_eq!(s.active(), Some(SectionName::Hero));
        assert_eq!(s.field("hero-title"), Some("Explore as"));
        assert_eq!(s.field("footer-logo"), None);
    }

    #[test]
    fn test_select_absent_section() {
        let mut s = EditorSession::new(Document::default());
        s.select(SectionName::About);
        assert_eq!(s.active(), Some(SectionName::About));
        assert_eq!(s.field("about-title"), None);
        assert!(matches!(
            s.set_field("about-title", "x"),
            Err(EditorError::SectionMissing(SectionName::About))
        ));
    }

    #[test]
    fn test_set_field_errors() {
        let mut s = session();
        assert!(matches!(
            s.set_field("hero-nonsense", "x"),
            Err(EditorError::UnknownField(_))
        ));
        assert!(matches!(
            s.set_field("hero-title", "x"),
            Err(EditorError::NotPopulated(_))
        ));
    }

    #[test]
    fn test_collect_without_edits_is_identity() {
        let mut s = session();
        for section in SectionName::ALL {
            s.select(section);
        }
        s.collect();
        assert_eq!(s.document(), &sample());
    }

    #[test]
    fn test_save_sends_collected_document() {
        let remote = FakeRemote::default();
        let mut s = session();
        s.select(SectionName::Hero);
        s.set_field("hero-title", "Viaje por").unwrap();

        s.save(&remote).unwrap();

        let saved = remote.saved.borrow();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].hero.as_ref().unwrap().title, "Viaje por");
        assert_eq!(saved[0].footer, sample().footer);
    }

    #[test]
    fn test_add_package_gets_fresh_id() {
        let mut s = session();
        let before = ids(&s);

        let draft = s.open_add_package().unwrap();
        draft.title = "Deserto".into();
        draft.price = "900".into();
        let id = s.confirm_package().unwrap();

        assert!(!id.is_empty());
        assert!(!before.contains(&id));
        let after = ids(&s);
        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(after.last(), Some(&id));
        assert_eq!(after.iter().collect::<HashSet<_>>().len(), after.len());
        assert!(s.modal().is_none());
    }

    #[test]
    fn test_add_package_creates_missing_section() {
        let mut s = EditorSession::new(Document::default());
        let draft = s.open_add_package().unwrap();
        draft.title = "Safari".into();
        draft.price = "500".into();
        let id = s.confirm_package().unwrap();

        assert_eq!(s.document().find_package(&id).unwrap().title, "Safari");
    }

    #[test]
    fn test_edit_package_keeps_id_and_position() {
        let mut s = session();
        let before = ids(&s);
        let target = before[0].clone();

        let draft = s.open_edit_package(&target).unwrap();
        assert_eq!(draft.title, "Quedas de Kalandula");
        draft.price = "75000".into();
        assert_eq!(s.confirm_package().unwrap(), target);

        assert_eq!(ids(&s), before);
        assert_eq!(s.document().find_package(&target).unwrap().price, "75000");
    }

    #[test]
    fn test_validation_keeps_modal_open() {
        let mut s = session();
        s.open_add_package().unwrap().title = "Só título".into();

        let err = s.confirm_package().unwrap_err();
        assert!(matches!(err, EditorError::Validation(ref missing) if missing == &["price"]));
        assert!(s.modal().is_some());
        assert_eq!(s.draft_mut().unwrap().title, "Só título");
        assert_eq!(ids(&s).len(), 2);
    }

    #[test]
    fn test_only_one_modal() {
        let mut s = session();
        s.open_add_package().unwrap();
        assert!(matches!(s.open_add_package(), Err(EditorError::ModalOpen)));
        assert!(matches!(
            s.open_edit_package("package-kalandula"),
            Err(EditorError::ModalOpen)
        ));

        assert!(s.cancel_package());
        assert!(!s.cancel_package());
        assert!(matches!(s.confirm_package(), Err(EditorError::NoModal)));
        assert!(matches!(s.draft_mut(), Err(EditorError::NoModal)));
    }

    #[test]
    fn test_cancel_discards_draft() {
        let mut s = session();
        s.open_edit_package("package-kalandula").unwrap().title = "Outro".into();
        s.cancel_package();
        assert_eq!(s.document(), &sample());
    }

    #[test]
    fn test_edit_unknown_package() {
        let mut s = session();
        assert!(matches!(
            s.open_edit_package("nope"),
            Err(EditorError::PackageNotFound(_))
        ));
        assert!(s.modal().is_none());
    }

    #[test]
    fn test_remove_package_keeps_others() {
        let mut s = session();
        let draft = s.open_add_package().unwrap();
        draft.title = "Terceiro".into();
        draft.price = "1".into();
        s.confirm_package().unwrap();
        let before = ids(&s);

        let removed = s.remove_package(&before[1]).unwrap();
        assert_eq!(removed.id, before[1]);
        assert_eq!(ids(&s), vec![before[0].clone(), before[2].clone()]);

        assert!(matches!(
            s.remove_package(&before[1]),
            Err(EditorError::PackageNotFound(_))
        ));
    }

    #[test]
    fn test_value_keys_are_stable() {
        let mut s = session();
        let keys = s.value_keys().to_vec();
        assert_eq!(keys.len(), 2);

        let added = s.add_value().unwrap();
        s.update_value(added, ValueField::Title, "Segurança").unwrap();
        s.remove_value(keys[0]).unwrap();

        // keys[1] still names the same entry after the removal shifted it
        s.update_value(keys[1], ValueField::Desc, "Editado").unwrap();
        let values = &s.document().about.as_ref().unwrap().values;
        assert_eq!(values.len(), 2);
        assert_eq!(values[0].desc, "Editado");
        assert_eq!(values[1].title, "Segurança");

        assert!(matches!(
            s.update_value(keys[0], ValueField::Title, "x"),
            Err(EditorError::ValueNotFound(_))
        ));
    }

    #[test]
    fn test_values_need_about_section() {
        let mut s = EditorSession::new(Document::default());
        assert!(matches!(
            s.add_value(),
            Err(EditorError::SectionMissing(SectionName::About))
        ));
        assert!(s.value_keys().is_empty());
    }

    #[test]
    fn test_upload_sets_field_and_preview() {
        let remote = FakeRemote::default();
        let mut s = session();
        s.select(SectionName::Hero);

        let url = s
            .upload_image(&remote, ImageSlot::HeroImage, Path::new("novo.jpg"))
            .unwrap();

        assert_eq!(url, "https://cdn.example.com/novo.jpg");
        assert_eq!(s.field("hero-image"), Some(url.as_str()));
        s.collect();
        assert_eq!(s.document().hero.as_ref().unwrap().main_image, url);
    }

    #[test]
    fn test_upload_without_populated_field() {
        let remote = FakeRemote::default();
        let mut s = session();
        let url = s
            .upload_image(&remote, ImageSlot::HeaderLogo, Path::new("logo.png"))
            .unwrap();
        assert_eq!(s.document().header.as_ref().unwrap().logo.image, url);
        assert_eq!(s.field("header-logo"), None);
    }

    #[test]
    fn test_upload_failure_leaves_document() {
        let remote = FakeRemote::failing();
        let mut s = session();
        s.select(SectionName::About);

        let err = s
            .upload_image(&remote, ImageSlot::AboutImage, Path::new("a.jpg"))
            .unwrap_err();

        assert!(matches!(err, EditorError::Remote(ClientError::UploadFailed(_))));
        assert_eq!(s.document(), &sample());
        assert_eq!(
            s.field("about-image"),
            Some(sample().about.unwrap().image.as_str())
        );
    }

    #[test]
    fn test_upload_into_package_draft() {
        let remote = FakeRemote::default();
        let mut s = session();

        assert!(matches!(
            s.upload_image(&remote, ImageSlot::PackageImage, Path::new("p.jpg")),
            Err(EditorError::NoModal)
        ));
        assert!(remote.uploads.borrow().is_empty());

        s.open_edit_package("package-namibe").unwrap();
        let url = s
            .upload_image(&remote, ImageSlot::PackageImage, Path::new("p.jpg"))
            .unwrap();
        assert_eq!(s.draft_mut().unwrap().image, url);
        // Not committed until confirmed
        assert_ne!(s.document().find_package("package-namibe").unwrap().image, url);

        s.confirm_package().unwrap();
        assert_eq!(s.document().find_package("package-namibe").unwrap().image, url);
    }

    #[test]
    fn test_gallery_add_and_remove() {
        let remote = FakeRemote::default();
        let mut s = session();
        let count = s.document().gallery.as_ref().unwrap().items.len();

        s.upload_image(
            &remote,
            ImageSlot::GalleryItem {
                caption: "Pôr do sol".into(),
            },
            Path::new("g.jpg"),
        )
        .unwrap();

        let items = &s.document().gallery.as_ref().unwrap().items;
        assert_eq!(items.len(), count + 1);
        assert_eq!(items[count].caption, "Pôr do sol");

        let removed = s.remove_gallery_item(0).unwrap();
        assert_eq!(removed, sample().gallery.unwrap().items[0]);
        assert!(matches!(
            s.remove_gallery_item(99),
            Err(EditorError::GalleryItemNotFound(99))
        ));
    }

    #[test]
    fn test_upload_missing_section_skips_network() {
        let remote = FakeRemote::default();
        let mut s = EditorSession::new(Document::default());
        assert!(matches!(
            s.upload_image(&remote, ImageSlot::HeroImage, Path::new("h.jpg")),
            Err(EditorError::SectionMissing(SectionName::Hero))
        ));
        assert!(remote.uploads.borrow().is_empty());
    }
}
