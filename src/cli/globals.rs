#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub api_url: String,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(api_url: String) -> Self {
        Self { api_url }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_args() {
        let args = GlobalArgs::new("https://itinero.local:8080".to_string());
        assert_eq!(args.api_url, "https://itinero.local:8080");
    }
}
