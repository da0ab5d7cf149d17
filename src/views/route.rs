//! Application routes.

use std::fmt;

/// Path prefix of product routes.
const PRODUCT_PREFIX: &str = "/p/";

/// Where the application is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    /// The scanner, at `/`.
    #[default]
    Scanner,
    /// A product, at `/p/{code}`.
    Product {
        /// The scanned code.
        code: String,
    },
}

impl Route {
    /// Creates a product route.
    pub fn product(code: impl Into<String>) -> Self {
        Self::Product { code: code.into() }
    }

    /// Parses a path. Returns `None` for paths that match no route.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.trim();
        if path.is_empty() || path == "/" {
            return Some(Self::Scanner);
        }

        let segment = path.strip_prefix(PRODUCT_PREFIX)?;
        if segment.is_empty() || segment.contains('/') {
            return None;
        }
        let code = urlencoding::decode(segment).ok()?;
        Some(Self::product(code.into_owned()))
    }

    /// Returns the path of this route.
    pub fn path(&self) -> String {
        match self {
            Self::Scanner => "/".to_string(),
            Self::Product { code } => format!("{PRODUCT_PREFIX}{}", urlencoding::encode(code)),
        }
    }

    /// Returns the product code, if this is a product route.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Product { code } => Some(code),
            Self::Scanner => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(Route::parse("/"), Some(Route::Scanner));
        assert_eq!(Route::parse(""), Some(Route::Scanner));
        assert_eq!(
            Route::parse("/p/7791234567890"),
            Some(Route::product("7791234567890"))
        );
        assert_eq!(Route::parse("/p/A%2FB"), Some(Route::product("A/B")));
        assert_eq!(Route::parse("/p/"), None);
        assert_eq!(Route::parse("/p/1/2"), None);
        assert_eq!(Route::parse("/admin"), None);
    }

    #[test]
    fn test_path() {
        assert_eq!(Route::Scanner.path(), "/");
        assert_eq!(Route::product("7791234567890").path(), "/p/7791234567890");
        assert_eq!(Route::product("A/B").to_string(), "/p/A%2FB");
        assert_eq!(Route::product("000").code(), Some("000"));
    }
}
