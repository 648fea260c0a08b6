//! 地址打印
//!
//! 词之间用空格，逗号打印为 ", "，横杠与斜杠两侧不留空格（"10-12"、"10/2"）

use crate::address::types::{
    AddressWord, CleanedAddressAst, CleanedAddressNode, FinalizeWordSpelling,
    ReorderWordsInSection, SeparatorType, StandardizedAddressAst,
};

fn spell(word: &AddressWord, finalize: Option<&FinalizeWordSpelling>) -> String {
    match finalize {
        Some(finalize) => finalize(word),
        None => word.value.clone(),
    }
}

fn print_nodes(nodes: &[CleanedAddressNode], finalize: Option<&FinalizeWordSpelling>) -> String {
    let mut result = String::new();
    // 下一个词前是否省略空格
    let mut glued = true;

    for node in nodes {
        match node {
            CleanedAddressNode::Word(word) => {
                if !glued {
                    result.push(' ');
                }
                result.push_str(&spell(word, finalize));
                glued = false;
            }
            CleanedAddressNode::Separator { separator_type } => {
                let (symbol, glue_next) = match separator_type {
                    SeparatorType::Comma => (',', false),
                    SeparatorType::Dash => ('-', true),
                    SeparatorType::Slash => ('/', true),
                };
                result.push(symbol);
                glued = glue_next;
            }
        }
    }

    result
}

/// 打印清洗后的地址
pub fn print_cleaned_address_ast(
    ast: &CleanedAddressAst,
    finalize: Option<&FinalizeWordSpelling>,
) -> String {
    print_nodes(&ast.children, finalize)
}

/// 打印单个标准化分段
pub fn print_standardized_address_section(
    nodes: &[CleanedAddressNode],
    finalize: Option<&FinalizeWordSpelling>,
) -> String {
    print_nodes(nodes, finalize)
}

/// 打印标准化地址：分段按层级顺序，以 ", " 连接
pub fn print_standardized_address_ast(
    ast: &StandardizedAddressAst,
    reorder: Option<&ReorderWordsInSection>,
    finalize: Option<&FinalizeWordSpelling>,
) -> String {
    ast.sections
        .iter()
        .map(|(&section_type, nodes)| match reorder {
            Some(reorder) => {
                print_standardized_address_section(&reorder(section_type, nodes.clone()), finalize)
            }
            None => print_standardized_address_section(nodes, finalize),
        })
        .filter(|section| !section.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}
