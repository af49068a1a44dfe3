use compact_str::CompactString;

/// Namespace constraint attached to a name test, resolved against the
/// context's [`crate::namespace::NamespaceTable`] at evaluation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NsSpec {
    /// Selector had no prefix: any namespace, or none, matches.
    Any,
    /// Matches only nodes without a namespace. Produced internally when a
    /// registered prefix resolves to the empty URI.
    None,
    /// Selector prefix; must resolve through the namespace table.
    Prefix(CompactString),
}

/// Element name constraint of a step. `name: None` is the `*` wildcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTest {
    pub name: Option<CompactString>,
    pub ns: NsSpec,
}

impl NameTest {
    pub fn any() -> Self {
        NameTest {
            name: None,
            ns: NsSpec::Any,
        }
    }

    pub fn named(name: impl Into<CompactString>) -> Self {
        NameTest {
            name: Some(name.into()),
            ns: NsSpec::Any,
        }
    }

    pub fn prefixed(prefix: impl Into<CompactString>, name: impl Into<CompactString>) -> Self {
        NameTest {
            name: Some(name.into()),
            ns: NsSpec::Prefix(prefix.into()),
        }
    }
}

/// One operation in a compiled pipeline.
///
/// The first three are generators: they walk an axis from the input node
/// and emit candidates for the remainder of the pipeline. The rest are
/// tests against the input node itself and always terminate a chain (or
/// feed further tests of the same node).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOp {
    /// Preorder search over element descendants. With a wildcard test
    /// this is the `*` all-descendants search.
    Descendants(NameTest),
    /// Immediate element children only (`>` combinator).
    Children(NameTest),
    /// The single next element sibling, if it matches (`+` combinator).
    NextSibling(NameTest),
    /// Filter-mode rewrite of `Descendants`: test the input node's own
    /// name and namespace instead of searching below it.
    SelfMatch(NameTest),
    /// Attribute present with exactly this value (`[name=value]`).
    AttrEquals {
        name: CompactString,
        value: CompactString,
    },
    /// Unconditionally emit the input node.
    CopySelf,
}

/// Whether a compiled selector searches below its input nodes or tests
/// them in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileMode {
    /// The first step descends into the input node's children.
    Search,
    /// The first step tests the input node itself.
    Filter,
}

/// A compiled selector: an owned pipeline of steps, evaluated in
/// sequence with each step fanning out into the remainder.
///
/// Invariant: `steps` is never empty; an empty selector text compiles to
/// a single [`StepOp::CopySelf`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub(crate) steps: Vec<StepOp>,
    mode: CompileMode,
}

impl Selector {
    pub(crate) fn new(steps: Vec<StepOp>, mode: CompileMode) -> Self {
        debug_assert!(!steps.is_empty());
        Selector { steps, mode }
    }

    pub fn mode(&self) -> CompileMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> impl Iterator<Item = &StepOp> {
        self.steps.iter()
    }
}
