// Cyclomatic complexity over a masked function body
//
// 1 + branch points: if, for, while, case, catch, &&, || and ?:. Comments and
// literals are already blank, so keywords inside them never count.

use once_cell::sync::Lazy;
use regex::Regex;

static BRANCH_KEYWORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:if|for|while|case|catch)\b").expect("valid branch pattern"));

/// `&&` read as an rvalue reference rather than a logical and
static RVALUE_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:\b(?:auto|bool|char|short|int|long|float|double|signed|unsigned|void|wchar_t|size_t)|>)\s*&&|&&\s*[),>]",
    )
    .expect("valid rvalue reference pattern")
});

/// Branch count of a masked body.
///
/// Approximate for C++: `&&` after `auto`, a builtin type or a closing `>`, or
/// directly before `)`, `,` or `>`, is taken as an rvalue reference and skipped.
/// `T&& x` with a plain named type still counts, as does `a<b> && c`.
pub fn cyclomatic(masked_body: &str) -> u32 {
    let keywords = BRANCH_KEYWORDS.find_iter(masked_body).count();
    let logical_and = masked_body
        .matches("&&")
        .count()
        .saturating_sub(RVALUE_REFERENCE.find_iter(masked_body).count());
    let operators =
        logical_and + masked_body.matches("||").count() + masked_body.matches('?').count();
    1 + (keywords + operators) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_line_code() {
        assert_eq!(cyclomatic("{ return a + b; }"), 1);
    }

    #[test]
    fn test_branches_and_conditions() {
        let body = "{ if (n <= 1 || n > 20) return 1; for (;;) { x = y ? 1 : 2; } }";
        assert_eq!(cyclomatic(body), 5);
    }

    #[test]
    fn test_logical_and_counts() {
        assert_eq!(cyclomatic("{ if (a && b && (c > 0 && d)) return; }"), 5);
    }

    #[test]
    fn test_rvalue_references_do_not_count() {
        let body = "{ auto&& item = next(); for (auto && x : xs) { sink(std::forward<T&&>(x)); } \
                    auto f = [](std::string&&, int&& n) { return n; }; \
                    std::vector<int>&& moved = take(); }";
        assert_eq!(cyclomatic(body), 2);
    }

    #[test]
    fn test_identifiers_containing_keywords_do_not_count() {
        assert_eq!(cyclomatic("{ int iffy = forward(casebook); }"), 1);
    }

    #[test]
    fn test_switch_counts_cases() {
        let body = "{ switch (k) { case 1: break; case 2: break; default: break; } }";
        assert_eq!(cyclomatic(body), 3);
    }
}
