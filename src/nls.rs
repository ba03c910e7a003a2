//! 本地化字符串
//!
//! 每条消息有一个 key 和英文默认模板，模板中的 `{0}`、`{1}` 按位置替换。
//! 可以加载 JSON 语言包（key → 模板）覆盖默认值。

use rustc_hash::FxHashMap;
use std::path::Path;
use std::sync::{OnceLock, RwLock};

fn bundle() -> &'static RwLock<FxHashMap<String, String>> {
    static BUNDLE: OnceLock<RwLock<FxHashMap<String, String>>> = OnceLock::new();
    BUNDLE.get_or_init(|| RwLock::new(FxHashMap::default()))
}

pub fn localize(key: &str, default: &str, args: &[&dyn std::fmt::Display]) -> String {
    let template = bundle()
        .read()
        .ok()
        .and_then(|b| b.get(key).cloned())
        .unwrap_or_else(|| default.to_string());
    format_template(&template, args)
}

/// Replaces the active message bundle.
pub fn set_bundle(messages: FxHashMap<String, String>) {
    if let Ok(mut b) = bundle().write() {
        *b = messages;
    }
}

pub fn load_bundle(path: &Path) -> std::io::Result<usize> {
    let data = std::fs::read_to_string(path)?;
    let messages: FxHashMap<String, String> = serde_json::from_str(&data)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    let count = messages.len();
    set_bundle(messages);
    Ok(count)
}

fn format_template(template: &str, args: &[&dyn std::fmt::Display]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let placeholder = tail
            .find('}')
            .and_then(|close| tail[..close].parse::<usize>().ok().map(|i| (i, close)));

        match placeholder {
            Some((index, close)) if index < args.len() => {
                out.push_str(&args[index].to_string());
                rest = &tail[close + 1..];
            }
            _ => {
                out.push('{');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}
