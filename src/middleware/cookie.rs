//! Cookie 读写

use axum::http::{header, HeaderMap, HeaderValue};

/// 从 `Cookie` header 中读取指定 cookie
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.trim_matches('"').to_string())
        .filter(|v| !v.is_empty())
}

/// `Set-Cookie` 参数
#[derive(Debug, Clone)]
pub struct SetCookie<'a> {
    pub name: &'a str,
    pub value: &'a str,
    pub max_age_secs: u64,
    pub http_only: bool,
    pub secure: bool,
}

impl SetCookie<'_> {
    /// 生成 header 值；cookie 值来自内部（语言代码、token），不含分号等特殊字符
    pub fn to_header(&self) -> Option<HeaderValue> {
        let mut cookie = format!(
            "{}={}; Path=/; Max-Age={}; SameSite=Lax",
            self.name, self.value, self.max_age_secs
        );
        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie).ok()
    }
}

/// 删除 cookie 的 header 值
pub fn clear_cookie(name: &str) -> Option<HeaderValue> {
    SetCookie {
        name,
        value: "",
        max_age_secs: 0,
        http_only: true,
        secure: false,
    }
    .to_header()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_value() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; locale=en; access_token=abc.def"),
        );
        assert_eq!(cookie_value(&headers, "locale"), Some("en".to_string()));
        assert_eq!(cookie_value(&headers, "access_token"), Some("abc.def".to_string()));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn test_cookie_value_multiple_headers() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("a=1"));
        headers.append(header::COOKIE, HeaderValue::from_static("locale=vi"));
        assert_eq!(cookie_value(&headers, "locale"), Some("vi".to_string()));
    }

    #[test]
    fn test_set_cookie_header() {
        let value = SetCookie {
            name: "locale",
            value: "en",
            max_age_secs: 60,
            http_only: false,
            secure: true,
        }
        .to_header()
        .unwrap();
        assert_eq!(value, "locale=en; Path=/; Max-Age=60; SameSite=Lax; Secure");

        let cleared = clear_cookie("access_token").unwrap();
        assert_eq!(cleared, "access_token=; Path=/; Max-Age=0; SameSite=Lax; HttpOnly");
    }
}
