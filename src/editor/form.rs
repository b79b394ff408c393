//! Form fields of the admin editor and their document bindings.
//!
//! Every editable scalar has a field id such as `hero-title`. The binding table
//! maps each id to its section and to a getter/setter pair on [`Document`].

use crate::content::{Document, SectionName};
use std::collections::BTreeMap;

/// One editable field bound to a document path.
#[derive(Clone, Copy)]
pub struct FieldSpec {
    pub id: &'static str,
    pub section: SectionName,
    get: fn(&Document) -> Option<&str>,
    set: fn(&mut Document, String),
}

impl FieldSpec {
    /// Current value, `None` when the section is absent.
    pub fn get<'a>(&self, document: &'a Document) -> Option<&'a str> {
        (self.get)(document)
    }

    /// Write `value`; a no-op when the section is absent.
    pub fn set(&self, document: &mut Document, value: String) {
        (self.set)(document, value)
    }
}

impl std::fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSpec")
            .field("id", &self.id)
            .field("section", &self.section)
            .finish()
    }
}

macro_rules! field_table {
    ($($id:literal => $variant:ident($section:ident $(. $path:ident)+)),* $(,)?) => {
        /// Every editable field, grouped by section in editor order.
        pub const FIELDS: &[FieldSpec] = &[
            $(FieldSpec {
                id: $id,
                section: SectionName::$variant,
                get: |doc| doc.$section.as_ref().map(|s| s $(.$path)+ .as_str()),
                set: |doc, value| {
                    if let Some(s) = doc.$section.as_mut() {
                        s $(.$path)+ = value;
                    }
                },
            }),*
        ];
    };
}

field_table! {
    "hero-tagline" => Hero(hero.tagline),
    "hero-title" => Hero(hero.title),
    "hero-titleHighlight" => Hero(hero.title_highlight),
    "hero-titleSuffix" => Hero(hero.title_suffix),
    "hero-description" => Hero(hero.description),
    "hero-image" => Hero(hero.main_image),
    "gallery-title" => Gallery(gallery.title),
    "gallery-subtitle" => Gallery(gallery.subtitle),
    "packages-title" => Packages(packages.title),
    "packages-subtitle" => Packages(packages.subtitle),
    "about-title" => About(about.title),
    "about-subtitle" => About(about.subtitle),
    "about-text" => About(about.text),
    "about-image" => About(about.image),
    "header-logo" => Header(header.logo.image),
    "header-logo-text" => Header(header.logo.text),
    "header-logo-subtext" => Header(header.logo.subtext),
    "header-bookButton" => Header(header.book_button),
    "footer-logo" => Footer(footer.logo),
    "footer-description" => Footer(footer.description),
    "footer-instagram" => Footer(footer.social.instagram),
    "footer-facebook" => Footer(footer.social.facebook),
    "footer-whatsapp" => Footer(footer.social.whatsapp),
    "footer-copyright" => Footer(footer.copyright),
}

pub fn lookup(id: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|spec| spec.id == id)
}

pub fn fields_of(section: SectionName) -> impl Iterator<Item = &'static FieldSpec> {
    FIELDS.iter().filter(move |spec| spec.section == section)
}

/// Values of the populated fields.
///
/// A field is populated once its section has been selected while present in
/// the document. Fields of sections never selected are not part of the form and
/// are never written back.
#[derive(Debug, Default)]
pub struct Form {
    values: BTreeMap<&'static str, String>,
}

impl Form {
    /// Copy a section's fields from the document (document → form).
    pub fn populate(&mut self, document: &Document, section: SectionName) {
        for spec in fields_of(section) {
            if let Some(value) = spec.get(document) {
                self.values.insert(spec.id, value.to_owned());
            }
        }
    }

    /// Write every populated field back (form → document).
    pub fn collect(&self, document: &mut Document) {
        for (id, value) in &self.values {
            if let Some(spec) = lookup(id) {
                spec.set(document, value.clone());
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.values.get(id).map(String::as_str)
    }

    /// Replace a populated field; returns `false` when `id` is not populated.
    pub fn set(&mut self, id: &str, value: String) -> bool {
        match self.values.get_mut(id) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    #[cfg(test)]
    pub fn is_populated(&self, id: &str) -> bool {
        self.values.contains_key(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn sample() -> Document {
        Document::from_json(include_str!("../embed/content-data.json")).unwrap()
    }

    #[test]
    fn test_field_ids_are_unique() {
        let ids: HashSet<_> = FIELDS.iter().map(|spec| spec.id).collect();
        assert_eq!(ids.len(), FIELDS.len());
        assert_eq!(FIELDS.len(), 24);
    }

    #[test]
    fn test_every_section_has_fields() {
        for section in SectionName::ALL {
            assert!(fields_of(section).next().is_some(), "{section} has no fields");
        }
    }

    #[test]
    fn test_getters_read_document_paths() {
        let doc = sample();
        let hero = doc.hero.as_ref().unwrap();
        let footer = doc.footer.as_ref().unwrap();

        assert_eq!(lookup("hero-titleHighlight").unwrap().get(&doc), Some(hero.title_highlight.as_str()));
        assert_eq!(lookup("hero-image").unwrap().get(&doc), Some(hero.main_image.as_str()));
        assert_eq!(
            lookup("footer-instagram").unwrap().get(&doc),
            Some(footer.social.instagram.as_str())
        );
        assert_eq!(
            lookup("header-logo-subtext").unwrap().get(&doc),
            Some(doc.header.as_ref().unwrap().logo.subtext.as_str())
        );
    }

    #[test]
    fn test_getter_on_absent_section() {
        let doc = Document::default();
        assert_eq!(lookup("about-title").unwrap().get(&doc), None);
    }

    #[test]
    fn test_setter_on_absent_section_is_noop() {
        let mut doc = Document::default();
        lookup("about-title").unwrap().set(&mut doc, "x".into());
        assert_eq!(doc, Document::default());
    }

    #[test]
    fn test_collect_populate_fixed_point() {
        let original = sample();
        let mut form = Form::default();
        for section in SectionName::ALL {
            form.populate(&original, section);
        }
        assert!(FIELDS.iter().all(|spec| form.is_populated(spec.id)));

        let mut collected = original.clone();
        form.collect(&mut collected);
        assert_eq!(collected, original);
    }

    #[test]
    fn test_set_requires_populated_field() {
        let doc = sample();
        let mut form = Form::default();
        assert!(!form.set("hero-title", "x".into()));

        form.populate(&doc, SectionName::Hero);
        assert!(form.set("hero-title", "Novo".into()));
        assert_eq!(form.get("hero-title"), Some("Novo"));
        assert!(!form.is_populated("footer-logo"));
    }

    #[test]
    fn test_collect_writes_only_populated_sections() {
        let mut doc = sample();
        let mut form = Form::default();
        form.populate(&doc, SectionName::Gallery);
        form.set("gallery-title", "Fotos".into());

        let footer_before = doc.footer.clone();
        form.collect(&mut doc);

        assert_eq!(doc.gallery.unwrap().title, "Fotos");
        assert_eq!(doc.footer, footer_before);
    }
}
