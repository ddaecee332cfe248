use vc_shape::info::{FieldAccess, FieldInfo, ScalarKind, ShapeInfo};
use vc_shape::{Shape, TypeDescriptor};

// -----------------------------------------------------------------------------
// PlanKind

/// How a value of the planned type is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanKind {
    /// `{ member: value, ... }` from the plan members.
    Object,
    /// `[ item, ... ]`.
    Sequence { item: &'static ShapeInfo },
    /// `{ key: value, ... }` from runtime entries.
    Dictionary {
        key: &'static ShapeInfo,
        value: &'static ShapeInfo,
    },
    Scalar(ScalarKind),
    /// No JSON form; writing fails.
    Opaque,
}

impl PlanKind {
    #[inline]
    pub const fn is_container(&self) -> bool {
        matches!(self, Self::Object | Self::Sequence { .. } | Self::Dictionary { .. })
    }
}

// -----------------------------------------------------------------------------
// MemberPlan

/// One member of an object plan.
#[derive(Debug, Clone)]
pub struct MemberPlan {
    name: &'static str,
    access: FieldAccess,
    declared: &'static ShapeInfo,
    renamed: bool,
    skip_when_null: bool,
}

impl MemberPlan {
    fn from_field(field: &FieldInfo) -> Self {
        Self {
            name: field.serial_name(),
            access: field.accessor(),
            declared: field.declared_info(),
            renamed: field.is_renamed(),
            skip_when_null: field.is_omit_null(),
        }
    }

    /// Returns the name before any naming policy.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn declared(&self) -> &'static ShapeInfo {
        self.declared
    }

    /// Returns `true` when the name was given explicitly. Such names are
    /// written as is, without a naming policy.
    #[inline]
    pub const fn is_renamed(&self) -> bool {
        self.renamed
    }

    /// Returns `true` when the member is left out while null, whatever the
    /// serializer options say.
    #[inline]
    pub const fn skip_when_null(&self) -> bool {
        self.skip_when_null
    }

    /// Reads the member value from `owner`.
    #[inline]
    pub fn get<'a>(&self, owner: &'a dyn Shape) -> Option<&'a dyn Shape> {
        (self.access)(owner)
    }
}

impl PartialEq for MemberPlan {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.declared == other.declared
            && self.renamed == other.renamed
            && self.skip_when_null == other.skip_when_null
    }
}

// -----------------------------------------------------------------------------
// WritePlan

/// Immutable description of how to write one type.
///
/// Built once per type from its static [`ShapeInfo`] and shared through a
/// [`PlanCache`](crate::PlanCache). Building only reads metadata, so two
/// builds of the same type always produce equal plans.
///
/// # Examples
///
/// ```
/// use vc_json::{PlanKind, WritePlan};
/// use vc_shape::{impl_shape_struct, Typed};
///
/// struct Account {
///     id: u64,
///     secret: String,
/// }
///
/// impl_shape_struct!(Account { id: u64, #[skip] secret: String });
///
/// let plan = WritePlan::build(Account::shape_info());
/// assert_eq!(plan.kind(), PlanKind::Object);
/// assert_eq!(plan.members().len(), 1);
/// assert_eq!(plan.members()[0].name(), "id");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WritePlan {
    descriptor: TypeDescriptor,
    kind: PlanKind,
    members: Box<[MemberPlan]>,
}

impl WritePlan {
    pub fn build(info: &'static ShapeInfo) -> Self {
        let (kind, members) = match info {
            ShapeInfo::Struct(info) => {
                let members = info
                    .fields()
                    .iter()
                    .filter(|field| !field.is_skipped())
                    .map(MemberPlan::from_field)
                    .collect();
                (PlanKind::Object, members)
            }
            ShapeInfo::List(info) => (
                PlanKind::Sequence {
                    item: info.item_info(),
                },
                Box::default(),
            ),
            ShapeInfo::Map(info) => (
                PlanKind::Dictionary {
                    key: info.key_info(),
                    value: info.value_info(),
                },
                Box::default(),
            ),
            ShapeInfo::Scalar(info) => (PlanKind::Scalar(info.scalar_kind()), Box::default()),
            ShapeInfo::Option(_) | ShapeInfo::Dynamic(_) | ShapeInfo::Opaque(_) => {
                (PlanKind::Opaque, Box::default())
            }
        };

        Self {
            descriptor: info.descriptor(),
            kind,
            members,
        }
    }

    #[inline]
    pub const fn descriptor(&self) -> TypeDescriptor {
        self.descriptor
    }

    #[inline]
    pub const fn kind(&self) -> PlanKind {
        self.kind
    }

    /// Members in write order, skipped fields already removed.
    #[inline]
    pub fn members(&self) -> &[MemberPlan] {
        &self.members
    }
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;

    use vc_shape::info::ScalarKind;
    use vc_shape::{Shape, Typed, impl_shape_struct};

    use super::{PlanKind, WritePlan};

    struct Empty {}

    impl_shape_struct!(Empty {});

    struct Tree {
        name: String,
        children: Vec<Tree>,
        parent: Option<Box<dyn Shape>>,
    }

    impl_shape_struct!(Tree {
        #[rename("label")] name: String,
        children: Vec<Tree>,
        #[omit_null] parent: Option<Box<dyn Shape>>,
    });

    #[test]
    fn object_members_follow_declaration() {
        let plan = WritePlan::build(Tree::shape_info());
        let names: Vec<_> = plan.members().iter().map(|m| m.name()).collect();
        assert_eq!(names, ["label", "children", "parent"]);
        assert!(plan.members()[0].is_renamed());
        assert!(!plan.members()[1].is_renamed());
        assert!(!plan.members()[0].skip_when_null());
        assert!(plan.members()[2].skip_when_null());
        assert!(plan.members()[1].declared().descriptor().is::<Vec<Tree>>());
    }

    #[test]
    fn empty_struct_is_an_empty_object() {
        let plan = WritePlan::build(Empty::shape_info());
        assert_eq!(plan.kind(), PlanKind::Object);
        assert!(plan.members().is_empty());
    }

    #[test]
    fn container_and_scalar_kinds() {
        let list = WritePlan::build(<Vec<Tree> as Typed>::shape_info());
        assert_eq!(
            list.kind(),
            PlanKind::Sequence {
                item: Tree::shape_info()
            }
        );

        let map = WritePlan::build(<BTreeMap<String, f64> as Typed>::shape_info());
        assert!(matches!(map.kind(), PlanKind::Dictionary { .. }));
        assert!(map.kind().is_container());

        let text = WritePlan::build(<String as Typed>::shape_info());
        assert_eq!(text.kind(), PlanKind::Scalar(ScalarKind::String));

        let any = WritePlan::build(<Box<dyn Shape> as Typed>::shape_info());
        assert_eq!(any.kind(), PlanKind::Opaque);
    }

    #[test]
    fn rebuilding_is_equal() {
        assert_eq!(
            WritePlan::build(Tree::shape_info()),
            WritePlan::build(Tree::shape_info())
        );
    }
}
