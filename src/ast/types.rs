use crate::Span;

/// A type as written in source, before resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeAnnotation {
    /// `num`, `bool`, `string` or a struct/class name.
    Symbol { name: String, span: Span },
    /// `[T]`
    List { base: Box<TypeAnnotation>, span: Span },
    /// `(A, B) -> R`
    Function {
        parameters: Vec<TypeAnnotation>,
        return_type: Box<TypeAnnotation>,
        span: Span,
    },
    /// `(A, B)`
    Procedure {
        parameters: Vec<TypeAnnotation>,
        span: Span,
    },
}

impl TypeAnnotation {
    pub fn get_span(&self) -> &Span {
        match self {
            TypeAnnotation::Symbol { span, .. }
            | TypeAnnotation::List { span, .. }
            | TypeAnnotation::Function { span, .. }
            | TypeAnnotation::Procedure { span, .. } => span,
        }
    }
}
