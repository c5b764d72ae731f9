pub mod gemini;
pub mod traits;

pub use gemini::GeminiProvider;
pub use traits::ResponseProvider;

/// Factory: create the right provider from config
pub fn create_provider(
    name: &str,
    api_key: Option<&str>,
    model: &str,
) -> anyhow::Result<Box<dyn ResponseProvider>> {
    match name {
        "gemini" | "google" | "google-gemini" => {
            Ok(Box::new(GeminiProvider::new(api_key, model)))
        }
        other => anyhow::bail!("Unknown provider '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_gemini_aliases() {
        for name in ["gemini", "google", "google-gemini"] {
            assert!(create_provider(name, Some("k"), "gemini-2.0-flash").is_ok());
        }
    }

    #[test]
    fn factory_unknown_is_an_error() {
        assert!(create_provider("hal9000", None, "m").is_err());
    }
}
