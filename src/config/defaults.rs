//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#true() -> bool {
    true
}

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [site] Section Defaults
// ============================================================================

pub mod site {
    pub fn name() -> String {
        "Enju Tours".into()
    }

    pub fn language() -> String {
        "pt-AO".into()
    }

    pub fn currency() -> String {
        "AOA".into()
    }

    pub fn whatsapp() -> String {
        "244933412292".into()
    }

    pub fn admin_login() -> String {
        "admin/admin-login.html".into()
    }
}

// ============================================================================
// [api] Section Defaults
// ============================================================================

pub mod api {
    use std::path::PathBuf;

    pub fn url() -> String {
        "http://localhost:5000/api".into()
    }

    pub fn fallback() -> PathBuf {
        "content-data.json".into()
    }

    pub fn state() -> PathBuf {
        "~/.config/enju/state.json".into()
    }
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn root() -> Option<PathBuf> {
        None
    }

    pub fn output() -> PathBuf {
        "public".into()
    }

    pub fn assets() -> PathBuf {
        "assets".into()
    }

    pub mod head {
        pub fn styles() -> Vec<String> {
            vec!["assets/css/style.css".into()]
        }
    }
}

// ============================================================================
// [serve] Section Defaults
// ============================================================================

pub mod serve {
    pub fn interface() -> String {
        "127.0.0.1".into()
    }

    pub fn port() -> u16 {
        5277
    }
}
