//! 地址 AST 类型定义

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// 地名类别（街道、房屋、居民点……）
///
/// 变体顺序即层级顺序：国家 → 地区 → … → 房屋部分
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Designation {
    Country,
    Region,
    County,
    District,
    Settlement,
    Place,
    Street,
    House,
    HousePart,
}

impl Designation {
    /// 对应的标准化分段，国家没有分段
    pub fn section_type(&self) -> Option<SectionType> {
        match self {
            Designation::Country => None,
            Designation::Region => Some(SectionType::Region),
            Designation::County | Designation::District => Some(SectionType::District),
            Designation::Settlement => Some(SectionType::Settlement),
            Designation::Place | Designation::Street => Some(SectionType::StreetOrPlace),
            Designation::House => Some(SectionType::House),
            Designation::HousePart => Some(SectionType::HousePart),
        }
    }
}

/// 语法性别（用于形容词一致）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "m")]
    Masculine,
    #[serde(rename = "f")]
    Feminine,
    #[serde(rename = "n")]
    Neuter,
}

/// 地名类别词配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignationConfig {
    /// 规范写法（如 "улица"）
    pub normalized_value: &'static str,
    pub designation: Designation,
    pub gender: Gender,
    /// 缩写别名（如 "ул"）
    pub aliases: Vec<&'static str>,
}

/// 词节点类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WordType {
    Unclassified,
    CardinalNumber,
    OrdinalNumber,
    Initial,
    Designation,
    DesignationAdjective,
}

/// 分隔符类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SeparatorType {
    Comma,
    Dash,
    Slash,
}

/// 词节点
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressWord {
    pub word_type: WordType,
    /// 可打印的值
    pub value: String,
    /// 数字部分（仅数字词）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    /// 数字后缀（仅数字词）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ending: Option<String>,
}

impl AddressWord {
    pub fn unclassified(value: impl Into<String>) -> Self {
        Self {
            word_type: WordType::Unclassified,
            value: value.into(),
            number: None,
            ending: None,
        }
    }

    /// 数字词：value = 数字 + 后缀
    pub fn number(word_type: WordType, digits: &str, ending: &str) -> Self {
        Self {
            word_type,
            value: format!("{}{}", digits, ending),
            number: Some(digits.to_string()),
            ending: Some(ending.to_string()),
        }
    }

    /// 收窄类型，已分类的词不能退回 unclassified
    pub(crate) fn retag(&mut self, word_type: WordType) {
        debug_assert!(
            word_type != WordType::Unclassified,
            "词节点不能退回 unclassified: {:?}",
            self
        );
        self.word_type = word_type;
    }

    pub fn ending_str(&self) -> &str {
        self.ending.as_deref().unwrap_or("")
    }
}

/// 清洗后的地址节点
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "nodeType", rename_all = "camelCase")]
pub enum CleanedAddressNode {
    Word(AddressWord),
    Separator { separator_type: SeparatorType },
}

impl CleanedAddressNode {
    pub fn separator(separator_type: SeparatorType) -> Self {
        CleanedAddressNode::Separator { separator_type }
    }

    pub fn as_word(&self) -> Option<&AddressWord> {
        match self {
            CleanedAddressNode::Word(word) => Some(word),
            CleanedAddressNode::Separator { .. } => None,
        }
    }

    pub fn as_word_mut(&mut self) -> Option<&mut AddressWord> {
        match self {
            CleanedAddressNode::Word(word) => Some(word),
            CleanedAddressNode::Separator { .. } => None,
        }
    }

    pub fn is_word_of(&self, word_type: WordType) -> bool {
        self.as_word().is_some_and(|w| w.word_type == word_type)
    }

    pub fn is_separator_of(&self, separator_type: SeparatorType) -> bool {
        matches!(self, CleanedAddressNode::Separator { separator_type: t } if *t == separator_type)
    }

    pub fn is_separator(&self) -> bool {
        matches!(self, CleanedAddressNode::Separator { .. })
    }
}

/// 清洗后的线性地址 AST
///
/// 不变式：首尾无分隔符，无相邻分隔符
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CleanedAddressAst {
    pub children: Vec<CleanedAddressNode>,
}

impl CleanedAddressAst {
    pub fn words(&self) -> impl Iterator<Item = &AddressWord> {
        self.children.iter().filter_map(CleanedAddressNode::as_word)
    }

    pub fn has_words(&self) -> bool {
        self.words().next().is_some()
    }

    /// 是否只是一个楼宇地址（地名类别词出现在基数之前，如 "ул. Такая-то, 10"）
    pub fn looks_like_building_address(&self) -> bool {
        let designation = self
            .children
            .iter()
            .position(|n| n.is_word_of(WordType::Designation));
        let cardinal = self
            .children
            .iter()
            .position(|n| n.is_word_of(WordType::CardinalNumber));

        matches!((designation, cardinal), (Some(d), Some(c)) if c > d)
    }
}

/// 标准化分段类型（按层级排序）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionType {
    Region,
    District,
    Settlement,
    StreetOrPlace,
    House,
    HousePart,
}

/// 标准化地址 AST：分段类型 → 分段内节点（保持原顺序）
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StandardizedAddressAst {
    pub sections: BTreeMap<SectionType, Vec<CleanedAddressNode>>,
}

impl StandardizedAddressAst {
    pub fn section(&self, section_type: SectionType) -> Option<&[CleanedAddressNode]> {
        self.sections.get(&section_type).map(Vec::as_slice)
    }
}

/// 分段内词序调整钩子
pub type ReorderWordsInSection =
    dyn Fn(SectionType, Vec<CleanedAddressNode>) -> Vec<CleanedAddressNode> + Send + Sync;

/// 词拼写最终处理钩子
pub type FinalizeWordSpelling = dyn Fn(&AddressWord) -> String + Send + Sync;
