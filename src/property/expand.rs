//! 属性模板展开
//!
//! - `${name}` 替换为属性的显示文本，失败时为空
//! - `?(name:text)` 属性可读时输出 text，`?(!name:text)` 相反
//! - `\n` `\t` `\r` `\xNN` 转义，其他 `\c` 输出 c

use super::Registry;
use crate::core::{Action, PropertyError};
use crate::player::PlaybackContext;

/// GET 成功或一般错误都算"存在"，不可用/未实现/禁用算不存在
fn is_available(name: &str, ctx: &mut PlaybackContext) -> bool {
    !matches!(
        Registry::dispatch_by_name(name, Action::Get, ctx),
        Err(PropertyError::Unavailable | PropertyError::NotImplemented | PropertyError::Disabled)
    )
}

/// 解析反斜杠之后的内容，返回输出字符和消耗的字节数
fn unescape(rest: &str) -> (Option<char>, usize) {
    let Some(c) = rest.chars().next() else {
        return (Some('\\'), 0);
    };
    match c {
        'n' => (Some('\n'), 1),
        't' => (Some('\t'), 1),
        'r' => (Some('\r'), 1),
        'x' => {
            let digits: usize = rest[1..]
                .chars()
                .take(2)
                .take_while(|c| c.is_ascii_hexdigit())
                .count();
            match u8::from_str_radix(&rest[1..1 + digits], 16) {
                Ok(byte) => (Some(byte as char), 1 + digits),
                Err(_) => (Some('x'), 1),
            }
        }
        other => (Some(other), other.len_utf8()),
    }
}

pub fn expand(template: &str, ctx: &mut PlaybackContext) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    let mut level = 0usize;
    // 被跳过的条件块所在层级
    let mut skip: Option<usize> = None;

    while let Some(c) = rest.chars().next() {
        if level > 0 && c == ')' {
            if skip.is_some_and(|l| level <= l) {
                skip = None;
            }
            level -= 1;
            rest = &rest[1..];
            continue;
        }

        if let Some(body) = rest.strip_prefix("${") {
            if let Some(end) = body.find('}') {
                if skip.is_none() {
                    if let Some(text) = Registry::print_by_name(&body[..end], ctx) {
                        out.push_str(&text);
                    }
                }
                rest = &body[end + 1..];
                continue;
            }
        }

        if let Some(body) = rest.strip_prefix("?(") {
            if let Some(end) = body.find(':') {
                level += 1;
                if skip.is_none() {
                    let (name, negate) = match body[..end].strip_prefix('!') {
                        Some(name) => (name, true),
                        None => (&body[..end], false),
                    };
                    if is_available(name, ctx) == negate {
                        skip = Some(level);
                    }
                }
                rest = &body[end + 1..];
                continue;
            }
        }

        if c == '\\' {
            let (ch, used) = unescape(&rest[1..]);
            if let (Some(ch), None) = (ch, skip) {
                out.push(ch);
            }
            rest = &rest[1 + used..];
            continue;
        }

        if skip.is_none() {
            out.push(c);
        }
        rest = &rest[c.len_utf8()..];
    }
    out
}
