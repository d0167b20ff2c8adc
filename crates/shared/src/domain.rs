use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(ViewportId);
id_newtype!(BlockerId);

/// The single durable record kept by the shell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    #[serde(default)]
    pub server_url: String,
}

impl Configuration {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.server_url.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewportKind {
    Setup,
    Main,
}

impl ViewportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Main => "main",
        }
    }
}

/// Storage partition of a browser session. Follows viewport identity, not URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionScope {
    Default,
    Viewport(ViewportId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageCategory {
    #[serde(rename = "appcache")]
    AppCache,
    #[serde(rename = "cookies")]
    Cookies,
    #[serde(rename = "filesystem")]
    FileSystem,
    #[serde(rename = "indexdb")]
    IndexedDb,
    #[serde(rename = "localstorage")]
    LocalStorage,
    #[serde(rename = "shadercache")]
    ShaderCache,
    #[serde(rename = "websql")]
    WebSql,
    #[serde(rename = "serviceworkers")]
    ServiceWorkers,
}

impl StorageCategory {
    pub const ALL: &'static [StorageCategory] = &[
        Self::AppCache,
        Self::Cookies,
        Self::FileSystem,
        Self::IndexedDb,
        Self::LocalStorage,
        Self::ShaderCache,
        Self::WebSql,
        Self::ServiceWorkers,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AppCache => "appcache",
            Self::Cookies => "cookies",
            Self::FileSystem => "filesystem",
            Self::IndexedDb => "indexdb",
            Self::LocalStorage => "localstorage",
            Self::ShaderCache => "shadercache",
            Self::WebSql => "websql",
            Self::ServiceWorkers => "serviceworkers",
        }
    }
}

/// Capability requested by hosted content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Permission {
    Geolocation,
    Notifications,
    Media,
    Other(String),
}

impl Permission {
    pub fn name(&self) -> &str {
        match self {
            Self::Geolocation => "geolocation",
            Self::Notifications => "notifications",
            Self::Media => "media",
            Self::Other(name) => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_uses_camel_case_key() {
        let json = serde_json::to_string(&Configuration::new("https://tak.example.com"))
            .expect("serialize");
        assert_eq!(json, r#"{"serverUrl":"https://tak.example.com"}"#);
    }

    #[test]
    fn configuration_without_url_is_unconfigured() {
        let config: Configuration = serde_json::from_str("{}").expect("deserialize");
        assert!(!config.is_configured());
        assert!(!Configuration::new("   ").is_configured());
        assert!(Configuration::new("https://tak.example.com").is_configured());
    }

    #[test]
    fn storage_categories_keep_wire_names() {
        let names: Vec<&str> = StorageCategory::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(
            names,
            [
                "appcache",
                "cookies",
                "filesystem",
                "indexdb",
                "localstorage",
                "shadercache",
                "websql",
                "serviceworkers"
            ]
        );
        let json = serde_json::to_string(&StorageCategory::IndexedDb).expect("serialize");
        assert_eq!(json, "\"indexdb\"");
    }

    #[test]
    fn permission_names_match_the_gate_vocabulary() {
        assert_eq!(Permission::Geolocation.name(), "geolocation");
        assert_eq!(Permission::Media.name(), "media");
        assert_eq!(Permission::Other("midi".into()).name(), "midi");
    }
}
