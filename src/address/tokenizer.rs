//! 地址分词器
//!
//! 将原始地址文本分割为：字母序列、数字序列、空白、标点，
//! 随后把按惯例属于同一个词的相邻 token 合并为 proto-word

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Token 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressTokenType {
    /// 字母序列（任意 Unicode 字母）
    LetterSequence,
    /// 数字序列
    NumberSequence,
    /// 合并后的词（"ул."、"р-н"、"42-й"、"41А"）
    ProtoWord,
    Period,
    Dash,
    Slash,
    Comma,
    Bracket,
    /// 空白符序列
    Spacing,
    /// 其他符号（引号、№ 等）
    Symbol,
}

impl AddressTokenType {
    /// 能产生词节点的 token
    pub fn is_word(&self) -> bool {
        matches!(
            self,
            AddressTokenType::LetterSequence
                | AddressTokenType::NumberSequence
                | AddressTokenType::ProtoWord
        )
    }

    /// 能产生分隔符节点的 token
    pub fn is_separator(&self) -> bool {
        matches!(
            self,
            AddressTokenType::Dash
                | AddressTokenType::Slash
                | AddressTokenType::Comma
                | AddressTokenType::Bracket
        )
    }
}

/// Token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressToken {
    pub token_type: AddressTokenType,
    pub value: String,
}

impl AddressToken {
    pub fn new(token_type: AddressTokenType, value: impl Into<String>) -> Self {
        Self {
            token_type,
            value: value.into(),
        }
    }
}

/// 提取 token
///
/// 字母、数字、空白按连续序列分组，每个标点单独成 token。
/// NFC 之后仍残留的组合符（重音符 "Ле́нина"）直接丢弃
pub fn extract_tokens(raw_address: &str) -> Vec<AddressToken> {
    let nfc: String = raw_address
        .nfc()
        .filter(|&c| !is_combining_mark(c))
        .collect();

    let mut tokens: Vec<AddressToken> = Vec::new();
    for ch in nfc.chars() {
        let token_type = classify_char(ch);
        let groups = matches!(
            token_type,
            AddressTokenType::LetterSequence
                | AddressTokenType::NumberSequence
                | AddressTokenType::Spacing
        );

        if groups {
            if let Some(last) = tokens.last_mut() {
                if last.token_type == token_type {
                    last.value.push(ch);
                    continue;
                }
            }
        }

        tokens.push(AddressToken::new(token_type, ch.to_string()));
    }

    tokens
}

/// 字符分类
fn classify_char(ch: char) -> AddressTokenType {
    match ch {
        '0'..='9' => AddressTokenType::NumberSequence,
        '.' => AddressTokenType::Period,
        '-' | '‐' | '‑' | '–' | '—' | '−' => AddressTokenType::Dash,
        '/' | '\\' => AddressTokenType::Slash,
        ',' | ';' => AddressTokenType::Comma,
        '(' | ')' | '[' | ']' | '{' | '}' => AddressTokenType::Bracket,
        c if c.is_whitespace() => AddressTokenType::Spacing,
        c if c.is_alphabetic() => AddressTokenType::LetterSequence,
        _ => AddressTokenType::Symbol,
    }
}

/// 当前未闭合的词
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenWord {
    /// 以字母结尾
    Letters,
    /// 纯数字
    Number,
}

/// 合并 proto-word
///
/// 只回看一个未闭合的词；任何不匹配的模式都会结束当前词
pub fn make_proto_words(tokens: Vec<AddressToken>) -> Vec<AddressToken> {
    let mut result: Vec<AddressToken> = Vec::with_capacity(tokens.len());
    let mut open_word: Option<OpenWord> = None;
    let mut index = 0;

    while index < tokens.len() {
        let token = &tokens[index];
        let next_type = tokens.get(index + 1).map(|t| t.token_type);

        if let (Some(open), Some(word)) = (open_word, result.last_mut()) {
            let glue_next = matches!(
                token.token_type,
                AddressTokenType::Dash | AddressTokenType::Slash
            ) && next_type == Some(AddressTokenType::LetterSequence);

            // что-то.
            if token.token_type == AddressTokenType::Period {
                word.token_type = AddressTokenType::ProtoWord;
                word.value.push_str(&token.value);
                open_word = None;
                index += 1;
                continue;
            }

            // такой-то, с/т, 42-й（斜杠只连接字母）
            if glue_next
                && (open == OpenWord::Letters || token.token_type == AddressTokenType::Dash)
            {
                word.token_type = AddressTokenType::ProtoWord;
                word.value.push_str(&token.value);
                word.value.push_str(&tokens[index + 1].value);
                open_word = Some(OpenWord::Letters);
                index += 2;
                continue;
            }

            // 41А 或 1ый（但不是 10к10）
            if open == OpenWord::Number
                && token.token_type == AddressTokenType::LetterSequence
                && next_type != Some(AddressTokenType::NumberSequence)
            {
                word.token_type = AddressTokenType::ProtoWord;
                word.value.push_str(&token.value);
                open_word = Some(OpenWord::Letters);
                index += 1;
                continue;
            }
        }

        open_word = match token.token_type {
            AddressTokenType::LetterSequence => Some(OpenWord::Letters),
            AddressTokenType::NumberSequence => Some(OpenWord::Number),
            _ => None,
        };
        result.push(token.clone());
        index += 1;
    }

    result
}
