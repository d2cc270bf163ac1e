use crate::models::{LineItem, UNKNOWN_CODE};

/// 在候选明细中查找与参考明细对应的行
///
/// 优先级:
/// 1. 商品编码精确匹配 (去空格、忽略大小写)
/// 2. 名称包含匹配 (任一方向，忽略大小写)
///
/// 多个候选同时满足名称包含时取第一个，这是启发式规则的已知局限。
///
/// 与字面包含规则不同: 空名称和 `UNKNOWN` 占位编码不与任何行对应 (空串按字面会被任何名称包含)。
pub fn find_matching_item<'a>(
    candidates: &'a [LineItem],
    reference_code: &str,
    reference_name: &str,
) -> Option<&'a LineItem> {
    let code = reference_code.trim().to_uppercase();
    // 占位编码不参与精确匹配，否则两侧缺编码的行会互相命中
    if !code.is_empty() && code != UNKNOWN_CODE {
        if let Some(hit) = candidates
            .iter()
            .find(|c| c.item_code.trim().to_uppercase() == code)
        {
            return Some(hit);
        }
    }

    let name = reference_name.trim().to_lowercase();
    if name.is_empty() {
        return None;
    }

    candidates.iter().find(|c| {
        let candidate = c.item_name.trim().to_lowercase();
        !candidate.is_empty() && (candidate.contains(&name) || name.contains(&candidate))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<LineItem> {
        vec![
            LineItem::new("B2", "Widget deluxe"),
            LineItem::new("a1", "Sprocket"),
            LineItem::new("C3", "Widget"),
        ]
    }

    #[test]
    fn exact_code_wins_over_name() {
        let candidates = items();
        let hit = find_matching_item(&candidates, " A1 ", "Widget").unwrap();
        assert_eq!(hit.item_code, "a1");
    }

    #[test]
    fn falls_back_to_name_containment_first_listed() {
        let candidates = items();
        let hit = find_matching_item(&candidates, "Z0", "widget").unwrap();
        assert_eq!(hit.item_code, "B2");
    }

    #[test]
    fn reference_name_may_contain_candidate_name() {
        let candidates = vec![LineItem::new("", "Bolt")];
        let hit = find_matching_item(&candidates, "", "Hex Bolt M8");
        assert!(hit.is_some());
    }

    #[test]
    fn no_match_returns_none() {
        let candidates = items();
        assert!(find_matching_item(&candidates, "Q7", "Gear").is_none());
    }

    #[test]
    fn placeholders_and_blanks_never_match() {
        let candidates = vec![LineItem::new(UNKNOWN_CODE, "")];
        assert!(find_matching_item(&candidates, UNKNOWN_CODE, "Widget").is_none());
        assert!(find_matching_item(&candidates, "unknown", "").is_none());
    }
}
