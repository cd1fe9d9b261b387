//! Selenium locator strategies and `By.*` detection.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use tmc_ast::{AstNode, NodeKind};

/// The supported locator strategies.
///
/// The serialized tags are the IR spellings (`css`, `xpath`, ...);
/// [`LocatorStrategy::from_by_member`] maps from the Selenium `By.*`
/// constructor names. Anything else is an unknown strategy and is
/// skipped by the locator extractor.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumString, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum LocatorStrategy {
    Css,
    Xpath,
    Id,
    Name,
    ClassName,
    TagName,
    LinkText,
    PartialLinkText,
}

impl LocatorStrategy {
    /// Map a `By.<member>` constructor name to a strategy.
    pub fn from_by_member(member: &str) -> Option<Self> {
        match member {
            "cssSelector" => Some(Self::Css),
            "xpath" => Some(Self::Xpath),
            "id" => Some(Self::Id),
            "name" => Some(Self::Name),
            "className" => Some(Self::ClassName),
            "tagName" => Some(Self::TagName),
            "linkText" => Some(Self::LinkText),
            "partialLinkText" => Some(Self::PartialLinkText),
            _ => None,
        }
    }
}

/// Detect a `By.*` invocation with a supported strategy.
///
/// Matches `MethodInvocation` nodes whose qualifier is `By` and whose
/// member is one of the known constructors.
pub fn by_strategy(node: &AstNode) -> Option<LocatorStrategy> {
    if node.kind != NodeKind::MethodInvocation {
        return None;
    }
    if node.qualifier() != Some("By") {
        return None;
    }
    node.member().and_then(LocatorStrategy::from_by_member)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_member_mapping() {
        assert_eq!(
            LocatorStrategy::from_by_member("cssSelector"),
            Some(LocatorStrategy::Css)
        );
        assert_eq!(
            LocatorStrategy::from_by_member("partialLinkText"),
            Some(LocatorStrategy::PartialLinkText)
        );
        assert_eq!(LocatorStrategy::from_by_member("shadowRoot"), None);
    }

    #[test]
    fn test_strategy_tags() {
        assert_eq!(LocatorStrategy::Css.to_string(), "css");
        assert_eq!(LocatorStrategy::ClassName.to_string(), "className");
        assert_eq!(
            "linkText".parse::<LocatorStrategy>().unwrap(),
            LocatorStrategy::LinkText
        );
    }

    #[test]
    fn test_by_strategy_detection() {
        let by = AstNode::new("n1", NodeKind::MethodInvocation)
            .unwrap()
            .with_attr("qualifier", "By")
            .with_attr("member", "id");
        assert_eq!(by_strategy(&by), Some(LocatorStrategy::Id));

        let other = AstNode::new("n2", NodeKind::MethodInvocation)
            .unwrap()
            .with_attr("qualifier", "driver")
            .with_attr("member", "findElement");
        assert_eq!(by_strategy(&other), None);
    }
}
