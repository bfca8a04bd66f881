//! 语言区域（越南语 / 英语）
//!
//! 纯数据类型，无 tokio/axum 依赖

use serde::{Deserialize, Serialize};

/// 站点支持的语言
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Vi,
    En,
}

impl Locale {
    /// 所有支持的语言
    pub const ALL: [Locale; 2] = [Locale::Vi, Locale::En];

    /// 转换为字符串
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Vi => "vi",
            Locale::En => "en",
        }
    }

    /// 从字符串解析，接受 `vi` / `en` 以及带地区的写法（`en-US`、`vi_VN`）
    pub fn parse(s: &str) -> Option<Self> {
        let primary = s
            .trim()
            .split(|c: char| c == '-' || c == '_')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        match primary.as_str() {
            "vi" => Some(Locale::Vi),
            "en" => Some(Locale::En),
            _ => None,
        }
    }

    /// 从 `Accept-Language` header 中选出第一个受支持的语言
    ///
    /// 按出现顺序选择，q 值为 0 的条目被忽略
    pub fn from_accept_language(header: &str) -> Option<Self> {
        header
            .split(',')
            .filter_map(|entry| {
                let mut parts = entry.split(';');
                let tag = parts.next()?.trim();
                let rejected = parts.any(|p| {
                    let p = p.trim();
                    p.strip_prefix("q=")
                        .and_then(|q| q.trim().parse::<f32>().ok())
                        .map_or(false, |q| q <= 0.0)
                });
                if rejected {
                    None
                } else {
                    Locale::parse(tag)
                }
            })
            .next()
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 按语言选择文本，首选语言为空时回退到另一种语言
pub fn pick<'a>(locale: Locale, vi: &'a str, en: &'a str) -> &'a str {
    let (preferred, fallback) = match locale {
        Locale::Vi => (vi, en),
        Locale::En => (en, vi),
    };
    if preferred.trim().is_empty() {
        fallback
    } else {
        preferred
    }
}

/// [`pick`] 的 owned 版本
pub fn pick_owned(locale: Locale, vi: &str, en: &str) -> String {
    pick(locale, vi, en).to_string()
}

/// 可选字段的语言选择
pub fn pick_opt(locale: Locale, vi: Option<&str>, en: Option<&str>) -> Option<String> {
    let text = pick(locale, vi.unwrap_or_default(), en.unwrap_or_default());
    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(Locale::parse("vi"), Some(Locale::Vi));
        assert_eq!(Locale::parse("EN"), Some(Locale::En));
        assert_eq!(Locale::parse("en-US"), Some(Locale::En));
        assert_eq!(Locale::parse("vi_VN"), Some(Locale::Vi));
        assert_eq!(Locale::parse("fr"), None);
        assert_eq!(Locale::parse(""), None);
    }

    #[test]
    fn test_accept_language_order() {
        assert_eq!(
            Locale::from_accept_language("fr-FR,fr;q=0.9,en-US;q=0.8,vi;q=0.7"),
            Some(Locale::En)
        );
        assert_eq!(
            Locale::from_accept_language("vi-VN, en;q=0.5"),
            Some(Locale::Vi)
        );
        assert_eq!(Locale::from_accept_language("de, ja"), None);
    }

    #[test]
    fn test_accept_language_skips_rejected() {
        assert_eq!(
            Locale::from_accept_language("en;q=0, vi;q=0.3"),
            Some(Locale::Vi)
        );
    }

    #[test]
    fn test_pick_fallback() {
        assert_eq!(pick(Locale::Vi, "Xin chào", "Hello"), "Xin chào");
        assert_eq!(pick(Locale::En, "Xin chào", "Hello"), "Hello");
        assert_eq!(pick(Locale::En, "Xin chào", "  "), "Xin chào");
        assert_eq!(pick(Locale::Vi, "", "Hello"), "Hello");
    }

    #[test]
    fn test_pick_opt() {
        assert_eq!(pick_opt(Locale::En, Some("Hà Nội"), None), Some("Hà Nội".to_string()));
        assert_eq!(pick_opt(Locale::Vi, None, None), None);
        assert_eq!(pick_opt(Locale::Vi, Some(""), Some(" ")), None);
    }

    #[test]
    fn test_default_is_vietnamese() {
        assert_eq!(Locale::default(), Locale::Vi);
    }
}
