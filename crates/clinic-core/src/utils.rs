//! 通用工具函数

/// 规范化国际电话号码
///
/// 去除空格、连字符和括号，保留前导加号。
/// 电话控件向表单状态回写的即是该规范化形式。
pub fn normalize_phone(raw: &str) -> String {
    let mut normalized = String::with_capacity(raw.len());
    for (i, c) in raw.trim().chars().enumerate() {
        match c {
            '+' if i == 0 => normalized.push('+'),
            '0'..='9' => normalized.push(c),
            ' ' | '-' | '(' | ')' | '.' => {}
            _ => normalized.push(c),
        }
    }
    normalized
}

/// 生成带国家区号前缀的显示占位符
pub fn phone_placeholder(country_calling_code: &str) -> String {
    format!("+{} 802 289 4950", country_calling_code.trim_start_matches('+'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("+234 802 289 4950"), "+2348022894950");
        assert_eq!(normalize_phone("+1 (555) 010-9999"), "+15550109999");
        assert_eq!(normalize_phone("  +2348022894950 "), "+2348022894950");
    }

    #[test]
    fn test_normalize_phone_keeps_invalid_chars_visible() {
        // 非法字符留给校验层报告，规范化不吞掉它们
        assert_eq!(normalize_phone("+234abc"), "+234abc");
    }

    #[test]
    fn test_phone_placeholder() {
        assert_eq!(phone_placeholder("234"), "+234 802 289 4950");
        assert_eq!(phone_placeholder("+234"), "+234 802 289 4950");
    }
}
