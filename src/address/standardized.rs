//! 标准化地址 AST 构建
//!
//! 把清洗后的线性节点按层级分组：地区 → 区 → 居民点 → 街道/地点 → 房屋 → 房屋部分。
//! 类别词顺序不符合层级时构建失败，由调用方回退到清洗结果

use thiserror::Error;

use crate::address::cleaned::build_cleaned_address_ast;
use crate::address::rules::AddressRules;
use crate::address::types::{
    AddressWord, CleanedAddressAst, CleanedAddressNode, Designation, SectionType, SeparatorType,
    StandardizedAddressAst, WordType,
};
use crate::config::AddressNormalizationConfig;

/// 地址无法按层级解释
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressInterpretationError {
    #[error("分段 {found:?} 出现在 {previous:?} 之后")]
    OutOfOrder {
        previous: SectionType,
        found: SectionType,
    },
    #[error("国家只能出现在地址开头")]
    CountryNotFirst,
    #[error("分段 {0:?} 缺少核心词")]
    MissingHeadWord(SectionType),
    #[error("无法识别的地址片段: \"{0}\"")]
    UnrecognizedFragment(String),
    #[error("地址中没有地名类别词")]
    NoDesignations,
}

/// 地址片段：逗号之间（或两个类别词之间）的节点
struct Fragment<'a> {
    nodes: &'a [CleanedAddressNode],
    designation: Option<Designation>,
}

impl Fragment<'_> {
    fn words(&self) -> impl Iterator<Item = &AddressWord> {
        self.nodes.iter().filter_map(CleanedAddressNode::as_word)
    }

    /// 只由基数组成（"10"、"10/2"、"10-12"）
    fn is_numeric(&self) -> bool {
        self.words().all(|w| w.word_type == WordType::CardinalNumber)
    }

    fn describe(&self) -> String {
        self.words()
            .map(|w| w.value.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// 去掉片段首尾的分隔符
fn trim_separators(nodes: &[CleanedAddressNode]) -> &[CleanedAddressNode] {
    let start = nodes.iter().position(|n| !n.is_separator()).unwrap_or(nodes.len());
    let end = nodes
        .iter()
        .rposition(|n| !n.is_separator())
        .map_or(start, |i| i + 1);
    &nodes[start..end]
}

/// 按逗号切分，再在每个额外的类别词前切分
fn split_into_fragments<'a>(
    ast: &'a CleanedAddressAst,
    rules: &AddressRules,
) -> Vec<Fragment<'a>> {
    let designation_of = |node: &CleanedAddressNode| {
        node.as_word()
            .filter(|w| w.word_type == WordType::Designation)
            .and_then(|w| rules.designations.find(&w.value))
            .map(|config| config.designation)
    };

    let mut fragments = Vec::new();
    for run in ast
        .children
        .split(|n| n.is_separator_of(SeparatorType::Comma))
    {
        let heads: Vec<(usize, Designation)> = run
            .iter()
            .enumerate()
            .filter_map(|(i, n)| designation_of(n).map(|d| (i, d)))
            .collect();

        let Some(&(first_head, first_designation)) = heads.first() else {
            fragments.push(Fragment {
                nodes: trim_separators(run),
                designation: None,
            });
            continue;
        };

        // "10 корпус 2"：类别词前的门牌号自成一段
        let mut starts: Vec<usize> = heads.iter().map(|&(i, _)| i).collect();
        let leading = Fragment {
            nodes: trim_separators(&run[..first_head]),
            designation: None,
        };
        let detach_leading = !leading.nodes.is_empty()
            && leading.is_numeric()
            && matches!(first_designation, Designation::House | Designation::HousePart);
        if detach_leading {
            fragments.push(leading);
        } else {
            starts[0] = 0;
        }

        for (k, &(_, designation)) in heads.iter().enumerate() {
            let end = starts.get(k + 1).copied().unwrap_or(run.len());
            let nodes = trim_separators(&run[starts[k]..end]);

            // "ул. Ленина 10"：名称分段末尾的门牌号自成一段
            let named = designation
                .section_type()
                .is_some_and(|section_type| section_type < SectionType::House);
            match trailing_house_number(nodes) {
                Some(split) if named => {
                    fragments.push(Fragment {
                        nodes: trim_separators(&nodes[..split]),
                        designation: Some(designation),
                    });
                    fragments.push(Fragment {
                        nodes: trim_separators(&nodes[split..]),
                        designation: None,
                    });
                }
                _ => fragments.push(Fragment {
                    nodes,
                    designation: Some(designation),
                }),
            }
        }
    }

    fragments
}

/// 门牌号（"10"、"10А"），不含 "30-летия" 这类带词尾的数字
fn is_house_number(node: &CleanedAddressNode) -> bool {
    node.as_word().is_some_and(|w| {
        w.word_type == WordType::CardinalNumber && w.ending_str().chars().count() <= 1
    })
}

/// 片段末尾门牌号（"10"、"10-12"、"10/2"）的起始位置，
/// 拆出后剩余部分必须仍有名称词
fn trailing_house_number(nodes: &[CleanedAddressNode]) -> Option<usize> {
    let mut start = nodes.len();
    while start > 0 {
        let node = &nodes[start - 1];
        let part_of_number = is_house_number(node)
            || node.is_separator_of(SeparatorType::Dash)
            || node.is_separator_of(SeparatorType::Slash);
        if !part_of_number {
            break;
        }
        start -= 1;
    }
    while start < nodes.len() && nodes[start].is_separator() {
        start += 1;
    }

    let remaining = trim_separators(&nodes[..start]);
    (start < nodes.len() && has_head_word(SectionType::StreetOrPlace, remaining)).then_some(start)
}

/// 分段是否有核心词
fn has_head_word(section_type: SectionType, nodes: &[CleanedAddressNode]) -> bool {
    let mut words = nodes.iter().filter_map(CleanedAddressNode::as_word);
    match section_type {
        SectionType::House => words.any(|w| {
            matches!(
                w.word_type,
                WordType::CardinalNumber | WordType::OrdinalNumber
            )
        }),
        _ => words.any(|w| {
            !matches!(
                w.word_type,
                WordType::Designation | WordType::DesignationAdjective
            )
        }),
    }
}

/// 构建标准化地址 AST
pub fn build_standardized_address_ast(
    cleaned_address_ast: &CleanedAddressAst,
    config: &AddressNormalizationConfig,
    rules: &AddressRules,
) -> Result<StandardizedAddressAst, AddressInterpretationError> {
    let mut ast = StandardizedAddressAst::default();
    let mut current: Option<SectionType> = None;
    let mut has_designation = false;

    for fragment in split_into_fragments(cleaned_address_ast, rules) {
        if fragment.nodes.is_empty() {
            continue;
        }

        let section_type = match fragment.designation {
            Some(designation) => {
                has_designation = true;
                match designation.section_type() {
                    Some(section_type) => section_type,
                    None => {
                        // 国家只校验位置，不进入任何分段
                        if current.is_some() {
                            return Err(AddressInterpretationError::CountryNotFirst);
                        }
                        continue;
                    }
                }
            }
            None if fragment.is_numeric() => match current {
                Some(previous) if previous >= SectionType::House => SectionType::HousePart,
                _ => SectionType::House,
            },
            None => {
                return Err(AddressInterpretationError::UnrecognizedFragment(
                    fragment.describe(),
                ))
            }
        };

        if let Some(previous) = current {
            if section_type < previous {
                return Err(AddressInterpretationError::OutOfOrder {
                    previous,
                    found: section_type,
                });
            }
        }

        let section = ast.sections.entry(section_type).or_default();
        if !section.is_empty() {
            section.push(CleanedAddressNode::separator(SeparatorType::Comma));
        }
        section.extend_from_slice(fragment.nodes);
        current = Some(section_type);
    }

    if !has_designation {
        return Err(AddressInterpretationError::NoDesignations);
    }

    if let Some((&section_type, _)) = ast
        .sections
        .iter()
        .find(|(&section_type, nodes)| !has_head_word(section_type, nodes))
    {
        return Err(AddressInterpretationError::MissingHeadWord(section_type));
    }

    // 缺少地区时补上默认地区
    if !ast.sections.contains_key(&SectionType::Region) {
        if let Some(default_region) = config.default_region() {
            let region = build_cleaned_address_ast(default_region, rules);
            if region.has_words() {
                ast.sections.insert(SectionType::Region, region.children);
            }
        }
    }

    Ok(ast)
}
