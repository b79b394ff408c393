//! The package add/edit modal.

use crate::content::Package;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalMode {
    Add,
    /// Editing the package with this id.
    Edit(String),
}

/// Editable copy of a package's fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageDraft {
    pub title: String,
    pub location: String,
    pub price: String,
    pub duration: String,
    pub description_long: String,
    pub included: String,
    pub image: String,
}

impl PackageDraft {
    pub fn from_package(pkg: &Package) -> Self {
        Self {
            title: pkg.title.clone(),
            location: pkg.location.clone(),
            price: pkg.price.clone(),
            duration: pkg.duration.clone(),
            description_long: pkg.description_long.clone(),
            included: pkg.included.clone(),
            image: pkg.image.clone(),
        }
    }

    /// Names of required fields that are blank.
    pub fn missing_required(&self) -> Vec<&'static str> {
        [("title", &self.title), ("price", &self.price)]
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
            .collect()
    }

    /// Write the draft over `base`, keeping its id and unmodelled keys.
    pub fn apply(self, base: Package) -> Package {
        Package {
            title: self.title,
            location: self.location,
            price: self.price,
            duration: self.duration,
            description_long: self.description_long,
            included: self.included,
            image: self.image,
            ..base
        }
    }
}

#[derive(Debug, Clone)]
pub struct PackageModal {
    pub mode: ModalMode,
    pub draft: PackageDraft,
}

impl PackageModal {
    pub fn add() -> Self {
        Self {
            mode: ModalMode::Add,
            draft: PackageDraft::default(),
        }
    }

    pub fn edit(pkg: &Package) -> Self {
        Self {
            mode: ModalMode::Edit(pkg.id.clone()),
            draft: PackageDraft::from_package(pkg),
        }
    }

    /// Heading shown for the modal.
    pub fn title(&self) -> &'static str {
        match self.mode {
            ModalMode::Add => "Adicionar Pacote",
            ModalMode::Edit(_) => "Editar Pacote",
        }
    }
}
