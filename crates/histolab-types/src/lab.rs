use serde::{Deserialize, Serialize};

/// Laboratory identity printed on composed reports.
///
/// Injected into the composer at construction time; nothing in the engine
/// reads identity strings from ambient global state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabIdentity {
    pub name: String,
    pub address: String,
    pub city: String,
    pub phone: String,
    pub email: String,
    /// Footer line for composed documents; when empty, renderers fall back to
    /// the address/phone fields.
    pub report_footer: String,
}

impl Default for LabIdentity {
    fn default() -> Self {
        Self {
            name: "HISTOPATHOLOGY DIAGNOSTIC LABORATORY".into(),
            address: String::new(),
            city: String::new(),
            phone: String::new(),
            email: String::new(),
            report_footer: String::new(),
        }
    }
}
