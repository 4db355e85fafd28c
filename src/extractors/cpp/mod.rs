//! C++ declaration extractor
//!
//! Everything the C extractor reports plus classes, namespaces (nested, `a::b`
//! and anonymous), access labels, constructors/destructors with initializer
//! lists, templates, operator overloads, out-of-line qualified definitions and
//! `extern "C"` blocks.

use crate::config::ExtractorConfig;
use crate::extractors::base::{BaseExtractor, ContextConfig, Declaration, ParseError};
use crate::extractors::scanner::BlockScanner;
use crate::language::LanguageVariant;

/// Main C++ extractor struct
pub struct CppExtractor {
    base: BaseExtractor,
}

impl CppExtractor {
    /// Run the lexical and brace passes over `content`
    pub fn new(file_path: String, content: String) -> Result<Self, ParseError> {
        Ok(Self {
            base: BaseExtractor::new(LanguageVariant::Cpp, file_path, content)?,
        })
    }

    pub fn set_context_config(&mut self, config: ContextConfig) {
        self.base.set_context_config(config);
    }

    /// Extract the declaration tree
    pub fn extract_declarations(&self, config: &ExtractorConfig) -> Vec<Declaration> {
        BlockScanner::new(&self.base, config).scan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::base::{DeclarationKind, Visibility};

    const SAMPLE: &str = include_str!("../../../test_samples/sample.cpp");

    fn extract(source: &str) -> Vec<Declaration> {
        CppExtractor::new("sample.cpp".to_string(), source.to_string())
            .unwrap()
            .extract_declarations(&ExtractorConfig::default())
    }

    fn kinds_and_names(decls: &[Declaration]) -> Vec<(DeclarationKind, &str)> {
        decls.iter().map(|d| (d.kind, d.name.as_str())).collect()
    }

    #[test]
    fn test_sample_namespace_contains_power() {
        let decls = extract(SAMPLE);
        assert_eq!(
            kinds_and_names(&decls),
            vec![
                (DeclarationKind::Namespace, "math"),
                (DeclarationKind::Class, "Vector"),
            ]
        );

        let math = &decls[0];
        assert_eq!(
            kinds_and_names(&math.children),
            vec![(DeclarationKind::Function, "power")]
        );
        let power = &math.children[0];
        assert_eq!(power.qualified_name, "math::power");
        assert_eq!(
            power.doc_comment.as_deref(),
            Some("/**\n * Calculate power\n */")
        );
        assert_eq!(power.complexity, Some(2));
    }

    #[test]
    fn test_sample_vector_members() {
        let decls = extract(SAMPLE);
        let vector = &decls[1];
        assert_eq!(
            vector.doc_comment.as_deref(),
            Some("/**\n * Vector class\n */")
        );
        assert_eq!(
            vector.signature.as_ref().unwrap().text,
            "class Vector"
        );

        let constructor = vector.find_child("Vector").unwrap();
        assert_eq!(constructor.kind, DeclarationKind::Constructor);
        assert_eq!(constructor.qualified_name, "Vector::Vector");
        assert_eq!(constructor.visibility, Some(Visibility::Public));
        assert_eq!(
            constructor.doc_comment.as_deref(),
            Some("/**\n     * Constructor\n     */")
        );

        let magnitude = vector.find_child("magnitude").unwrap();
        assert_eq!(magnitude.kind, DeclarationKind::Method);
        assert_eq!(
            magnitude.signature.as_ref().unwrap().return_type.as_deref(),
            Some("double")
        );

        let x = vector.find_child("x").unwrap();
        assert_eq!(x.kind, DeclarationKind::Field);
        assert_eq!(x.visibility, Some(Visibility::Private));
    }

    #[test]
    fn test_sample_is_idempotent_and_round_trips() {
        let first = extract(SAMPLE);
        assert_eq!(first, extract(SAMPLE));

        let power = first[0].find_child("power").unwrap();
        assert_eq!(
            power.body_text(SAMPLE),
            Some("{\n    int result = 1;\n    for (int i = 0; i < exp; i++) {\n        result *= base;\n    }\n    return result;\n}")
        );
        let vector = &first[1];
        assert_eq!(vector.find_child("Vector").unwrap().body_text(SAMPLE), Some("{}"));
        assert_eq!(
            vector.find_child("magnitude").unwrap().body_text(SAMPLE),
            Some("{\n        return sqrt(x*x + y*y);\n    }")
        );
        let class_body = vector.body_text(SAMPLE).unwrap();
        assert!(class_body.starts_with("{\nprivate:\n    double x, y;"));
        assert!(class_body.ends_with("    }\n}"));
    }

    #[test]
    fn test_raw_strings_and_digit_separators() {
        let source = "\
const char *pattern = R\"re(\\{[a-z]+\\})re\";
long limit = 1'000'000;
int check(int n) {
    return n < 2'000 ? 1 : 0;
}
";
        let decls = extract(source);
        assert_eq!(
            kinds_and_names(&decls),
            vec![(DeclarationKind::Function, "check")]
        );
        assert_eq!(decls[0].complexity, Some(2));
        assert_eq!(
            decls[0].body_text(source),
            Some("{\n    return n < 2'000 ? 1 : 0;\n}")
        );
    }

    #[test]
    fn test_templates_and_operators() {
        let source = "\
template <typename T>
class Box {
public:
    explicit Box(T value) : value_(value) {}
    ~Box() = default;
    Box& operator=(const Box& other) = default;
    bool operator==(const Box& other) const noexcept { return value_ == other.value_; }
    operator bool() const { return true; }
    virtual T get() const = 0;
private:
    T value_;
};
";
        let decls = extract(source);
        let class = &decls[0];
        assert_eq!(class.name, "Box");
        assert!(class.signature.as_ref().unwrap().text.starts_with("template <typename T>"));
        assert_eq!(
            kinds_and_names(&class.children),
            vec![
                (DeclarationKind::Constructor, "Box"),
                (DeclarationKind::Destructor, "~Box"),
                (DeclarationKind::Method, "operator="),
                (DeclarationKind::Method, "operator=="),
                (DeclarationKind::Method, "operator bool"),
                (DeclarationKind::Method, "get"),
                (DeclarationKind::Field, "value_"),
            ]
        );
        let value = class.find_child("value_").unwrap();
        assert_eq!(value.visibility, Some(Visibility::Private));
    }

    #[test]
    fn test_struct_members_default_public() {
        let decls = extract("struct P { int x; };\nclass C { int y; };\n");
        assert_eq!(decls[0].children[0].visibility, Some(Visibility::Public));
        assert_eq!(decls[1].children[0].visibility, Some(Visibility::Private));
    }

    #[test]
    fn test_out_of_line_constructor() {
        let source = "\
namespace geo {
class Shape {
public:
    Shape();
    double area() const;
};

Shape::Shape() {}

double Shape::area() const {
    return 0.0;
}
}
";
        let decls = extract(source);
        let geo = &decls[0];
        assert_eq!(
            kinds_and_names(&geo.children),
            vec![
                (DeclarationKind::Class, "Shape"),
                (DeclarationKind::Constructor, "Shape"),
                (DeclarationKind::Method, "area"),
            ]
        );
        assert_eq!(geo.children[1].qualified_name, "geo::Shape::Shape");
        assert_eq!(geo.children[2].qualified_name, "geo::Shape::area");
        assert!(geo.children[2].body_span.is_some());
    }

    #[test]
    fn test_comments_and_strings_hide_braces() {
        let source = "\
// not a function: void ghost() {
const char *open = \"{\";
/* class Hidden { }; */
int real() { return '}'; }
";
        let decls = extract(source);
        assert_eq!(
            kinds_and_names(&decls),
            vec![(DeclarationKind::Function, "real")]
        );
    }
}
