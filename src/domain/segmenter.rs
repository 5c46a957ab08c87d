//! 句子分割器
//!
//! 把归一化后的原始文本切成可朗读的句子序列。
//! 纯函数、确定性：相同输入永远得到相同的切分结果。

/// 检查是否为句末标点（总是分割）
#[inline]
fn is_terminal(ch: char) -> bool {
    matches!(ch, '.' | '?' | '!' | '。' | '？' | '！')
}

/// 检查是否为闭引号（跟在句末标点后面时归属当前句子）
#[inline]
fn is_closing_quote(ch: char) -> bool {
    // 中文引号: " (\u{201D})  中文单引号: ' (\u{2019})
    matches!(ch, '"' | '\u{201D}' | '\'' | '\u{2019}')
}

/// 检查片段是否只包含引号或空白（应合并到前一个句子）
#[inline]
fn is_trivial_fragment(s: &str) -> bool {
    // 中文引号: " (\u{201C}) " (\u{201D})  中文单引号: ' (\u{2018}) ' (\u{2019})
    s.chars().all(|c| {
        matches!(
            c,
            '"' | '\u{201C}' | '\u{201D}' | '\'' | '\u{2018}' | '\u{2019}' | ' ' | '\t'
        )
    })
}

/// 对文本进行句子切分
///
/// 切分策略：
/// 1. 把内嵌换行（及连续空白）归一化为单个空格
/// 2. 按句末标点分割，标点保留在句子末尾
/// 3. 句末标点后紧跟的闭引号归属当前句子
/// 4. 丢弃空白片段；只含引号的片段并入前一个句子
///
/// 保证：
/// - 输入含有至少一个非空白、非标点字符时，输出非空
/// - 输出保持原文从左到右的顺序
/// - 没有句末标点的文本原样（去掉首尾空白后）作为唯一一个句子返回
pub fn segment(text: &str) -> Vec<String> {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut units: Vec<String> = Vec::new();
    let mut current = String::new();

    let mut chars = normalized.chars().peekable();
    while let Some(ch) = chars.next() {
        current.push(ch);
        if is_terminal(ch) {
            // "……！"他说。—— 闭引号在分割前并入当前句子
            while let Some(&quote) = chars.peek() {
                if !is_closing_quote(quote) {
                    break;
                }
                current.push(quote);
                chars.next();
            }
            flush(&mut units, &mut current);
        }
    }
    flush(&mut units, &mut current);

    units
}

/// 把累积的片段推入结果；空白片段丢弃，引号片段并入前一个句子
fn flush(units: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if trimmed.is_empty() {
        current.clear();
        return;
    }

    if is_trivial_fragment(trimmed) {
        if let Some(last) = units.last_mut() {
            last.push_str(trimmed);
        } else {
            units.push(trimmed.to_string());
        }
    } else {
        units.push(trimmed.to_string());
    }
    current.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_on_terminal_punctuation() {
        let units = segment("First sentence. Second one! Third?");
        assert_eq!(units, vec!["First sentence.", "Second one!", "Third?"]);
    }

    #[test]
    fn test_no_terminal_punctuation_yields_single_unit() {
        let units = segment("  a title without punctuation  ");
        assert_eq!(units, vec!["a title without punctuation"]);
    }

    #[test]
    fn test_line_breaks_normalized_to_spaces() {
        let units = segment("A sentence\nbroken across\r\nlines. Next.");
        assert_eq!(units, vec!["A sentence broken across lines.", "Next."]);
    }

    #[test]
    fn test_empty_and_whitespace_fragments_discarded() {
        let units = segment("One.   \n\n  Two.");
        assert_eq!(units, vec!["One.", "Two."]);

        assert!(segment("").is_empty());
        assert!(segment("   \n\t  ").is_empty());
    }

    #[test]
    fn test_preserves_source_order() {
        let text = "Alpha. Bravo. Charlie. Delta.";
        let units = segment(text);
        assert_eq!(units.len(), 4);
        // 重新拼接后与归一化输入一致（空白有损、顺序无损）
        assert_eq!(units.join(" "), text);
    }

    #[test]
    fn test_closing_quote_stays_with_sentence() {
        let units = segment("\"Stop right there!\" he said.");
        assert_eq!(units, vec!["\"Stop right there!\"", "he said."]);
    }

    #[test]
    fn test_trailing_quote_stays_with_final_sentence() {
        let units = segment("He whispered, \"Run.\"");
        assert_eq!(units, vec!["He whispered, \"Run.\""]);
    }

    #[test]
    fn test_cjk_terminal_punctuation() {
        let units = segment("第一句。第二句！第三句？");
        assert_eq!(units, vec!["第一句。", "第二句！", "第三句？"]);
    }

    #[test]
    fn test_cjk_closing_quote_after_terminal() {
        let units = segment("他说\u{201C}快跑。\u{201D}然后转身。");
        assert_eq!(units, vec!["他说\u{201C}快跑。\u{201D}", "然后转身。"]);
    }

    #[test]
    fn test_trivial_fragment_detection() {
        assert!(is_trivial_fragment("\""));
        assert!(is_trivial_fragment("\" "));
        assert!(!is_trivial_fragment("content"));
    }
}
