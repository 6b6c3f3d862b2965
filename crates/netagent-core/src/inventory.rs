//! 应用程序池清单解析（`appcmd list apppool /xml` 输出）。
//!
//! 输出示例：
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <appcmd>
//!     <APPPOOL APPPOOL.NAME="DefaultAppPool" PipelineMode="Integrated" RuntimeVersion="v4.0" state="Started" />
//! </appcmd>
//! ```
//!
//! 作者：NetAgent 安装器项目组
//! 创建时间：2026-10-14
//! 修改时间：2026-10-14

use std::sync::OnceLock;

use regex::Regex;

use crate::host::ApplicationPoolInfo;

fn apppool_element() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<APPPOOL\s([^>]*)/?>").expect("valid regex"))
}

fn attribute() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"([A-Za-z0-9_.:-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid regex")
    })
}

/// 解析元素内的属性列表，返回 `(名称, 已还原实体的值)`。
pub(crate) fn xml_attributes(element: &str) -> Vec<(String, String)> {
    attribute()
        .captures_iter(element)
        .map(|c| {
            let raw = c.get(2).or_else(|| c.get(3)).map_or("", |m| m.as_str());
            (c[1].to_string(), unescape_xml(raw))
        })
        .collect()
}

/// 解析 `appcmd list apppool /xml` 的输出。
///
/// 不认识的内容直接忽略；缺少名称的元素会被跳过，缺少 `RuntimeVersion` 的按空字符串处理。
pub fn parse_appcmd_apppools(xml: &str) -> Vec<ApplicationPoolInfo> {
    let mut pools = Vec::new();
    for element in apppool_element().captures_iter(xml) {
        let mut name = None;
        let mut runtime = String::new();
        for (key, value) in xml_attributes(&element[1]) {
            if key.eq_ignore_ascii_case("APPPOOL.NAME") {
                name = Some(value);
            } else if key.eq_ignore_ascii_case("RuntimeVersion") {
                runtime = value;
            }
        }
        if let Some(name) = name {
            pools.push(ApplicationPoolInfo {
                name,
                managed_runtime_version: runtime,
            });
        }
    }
    pools
}

/// 还原 XML 预定义实体。
pub(crate) fn unescape_xml(raw: &str) -> String {
    raw.replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
