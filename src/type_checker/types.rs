//! Resolved types and the relations between them.
//!
//! Struct and class types live in a [`TypeTable`] and are referred to by
//! [`ObjectId`], which lets a struct mention itself or a later struct in its
//! fields without building reference cycles. Every relation that needs to
//! look inside an object type is therefore a method on the table.

use std::fmt::Display;

use crate::ast::statements::ObjectKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub usize);

impl Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Bool,
    Num,
    String,
    List(Box<Type>),
    Struct(ObjectId),
    Class(ObjectId),
    Function {
        parameters: Vec<Type>,
        return_type: Box<Type>,
    },
    Procedure {
        parameters: Vec<Type>,
    },
}

impl Type {
    pub fn list_of(base: Type) -> Type {
        Type::List(Box::new(base))
    }

    pub fn element_type(&self) -> Option<&Type> {
        match self {
            Type::List(base) => Some(base),
            _ => None,
        }
    }

    pub fn object_id(&self) -> Option<ObjectId> {
        match self {
            Type::Struct(id) | Type::Class(id) => Some(*id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectType {
    pub name: String,
    pub kind: ObjectKind,
    pub fields: Vec<Field>,
    /// False between registration and the end of the declaration's analysis.
    pub complete: bool,
}

impl ObjectType {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// Owns every struct and class type declared in one program.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeTable {
    objects: Vec<ObjectType>,
}

impl TypeTable {
    pub fn new() -> Self {
        TypeTable::default()
    }

    /// Registers a fieldless, incomplete object type.
    pub fn declare(&mut self, name: &str, kind: ObjectKind) -> ObjectId {
        let id = ObjectId(self.objects.len());
        self.objects.push(ObjectType {
            name: String::from(name),
            kind,
            fields: vec![],
            complete: false,
        });
        id
    }

    pub fn type_of(&self, id: ObjectId) -> Type {
        match self.object(id).kind {
            ObjectKind::Struct => Type::Struct(id),
            ObjectKind::Class => Type::Class(id),
        }
    }

    pub fn complete(&mut self, id: ObjectId, fields: Vec<Field>) {
        let object = &mut self.objects[id.0];
        object.fields = fields;
        object.complete = true;
    }

    pub fn object(&self, id: ObjectId) -> &ObjectType {
        &self.objects[id.0]
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn is_equivalent(&self, a: &Type, b: &Type) -> bool {
        self.equivalent(a, b, &mut vec![])
    }

    /// Struct pairs already under comparison are assumed equivalent, so
    /// mutually referencing structs compare in finite time.
    fn equivalent(&self, a: &Type, b: &Type, assumed: &mut Vec<(ObjectId, ObjectId)>) -> bool {
        match (a, b) {
            (Type::Bool, Type::Bool) | (Type::Num, Type::Num) | (Type::String, Type::String) => {
                true
            }
            (Type::List(a), Type::List(b)) => self.equivalent(a, b, assumed),
            (Type::Struct(x), Type::Struct(y)) => {
                if x == y || assumed.contains(&(*x, *y)) {
                    return true;
                }

                let (left, right) = (&self.object(*x).fields, &self.object(*y).fields);
                if left.len() != right.len() {
                    return false;
                }

                assumed.push((*x, *y));
                let result = left.iter().zip(right).all(|(f, g)| {
                    f.name == g.name && self.equivalent(&f.ty, &g.ty, assumed)
                });
                assumed.pop();
                result
            }
            (Type::Class(x), Type::Class(y)) => x == y,
            (
                Type::Function {
                    parameters: p,
                    return_type: r,
                },
                Type::Function {
                    parameters: q,
                    return_type: s,
                },
            ) => {
                p.len() == q.len()
                    && p.iter().zip(q).all(|(a, b)| self.equivalent(a, b, assumed))
                    && self.equivalent(r, s, assumed)
            }
            (Type::Procedure { parameters: p }, Type::Procedure { parameters: q }) => {
                p.len() == q.len() && p.iter().zip(q).all(|(a, b)| self.equivalent(a, b, assumed))
            }
            _ => false,
        }
    }

    /// Whether a value of type `from` may be stored where `to` is expected.
    pub fn is_assignable(&self, from: &Type, to: &Type) -> bool {
        match (from, to) {
            (Type::Struct(x), Type::Struct(y)) | (Type::Class(x), Type::Class(y)) => {
                self.object(*x).name == self.object(*y).name
            }
            (
                Type::Function {
                    parameters: p,
                    return_type: r,
                },
                Type::Function {
                    parameters: q,
                    return_type: s,
                },
            ) => {
                p.len() == q.len()
                    && self.is_assignable(r, s)
                    && q.iter().zip(p).all(|(target, source)| self.is_assignable(target, source))
            }
            (Type::Procedure { parameters: p }, Type::Procedure { parameters: q }) => {
                p.len() == q.len()
                    && q.iter().zip(p).all(|(target, source)| self.is_assignable(target, source))
            }
            _ => self.is_equivalent(from, to),
        }
    }

    /// The source-level spelling of `ty`, used in diagnostics.
    pub fn describe(&self, ty: &Type) -> String {
        match ty {
            Type::Bool => String::from("bool"),
            Type::Num => String::from("num"),
            Type::String => String::from("string"),
            Type::List(base) => format!("[{}]", self.describe(base)),
            Type::Struct(id) | Type::Class(id) => self.object(*id).name.clone(),
            Type::Function {
                parameters,
                return_type,
            } => format!(
                "({})->{}",
                self.describe_all(parameters),
                self.describe(return_type)
            ),
            Type::Procedure { parameters } => format!("({})", self.describe_all(parameters)),
        }
    }

    fn describe_all(&self, types: &[Type]) -> String {
        types
            .iter()
            .map(|ty| self.describe(ty))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
