use crate::config::ScopeRules;
use crate::graph::{Declaration, DeclarationKind, Heritage, Reference, ReferenceContext, Visibility};
use crate::project::ProjectModel;
use std::path::Path;
use tracing::trace;

/// Why a reference does or does not count as a call-site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceClass {
    CallSite,
    /// The reference lives in a test file
    TestFile,
    /// The declaration's own name
    SelfDeclaration,
    Import,
    Export,
    /// Type annotation or `typeof` query
    TypeOnly,
    /// Property access on a runtime global (`console.warn`)
    GlobalMember,
}

/// Separates real uses of a symbol from declarations, imports, exports and types
pub struct ReferenceClassifier<'a> {
    model: &'a ProjectModel,
    rules: &'a ScopeRules,
}

impl<'a> ReferenceClassifier<'a> {
    pub fn new(model: &'a ProjectModel, rules: &'a ScopeRules) -> Self {
        Self { model, rules }
    }

    pub fn classify(&self, reference: &Reference, declaring_file: &Path) -> ReferenceClass {
        let file = &reference.location.file;

        if self.rules.is_test_file(self.model.relative_path(file)) {
            return ReferenceClass::TestFile;
        }
        if reference.context == ReferenceContext::Declaration && file == declaring_file {
            return ReferenceClass::SelfDeclaration;
        }
        if reference.context.is_import() {
            return ReferenceClass::Import;
        }
        if reference.context.is_export() {
            return ReferenceClass::Export;
        }
        if reference.context.is_type_only() {
            return ReferenceClass::TypeOnly;
        }
        if reference
            .receiver
            .as_deref()
            .is_some_and(|receiver| self.rules.is_global_receiver(receiver))
        {
            return ReferenceClass::GlobalMember;
        }

        ReferenceClass::CallSite
    }

    pub fn count_call_sites(&self, references: &[Reference], declaring_file: &Path) -> usize {
        self.count_call_sites_where(references, declaring_file, |_| true)
    }

    /// Like [`count_call_sites`](Self::count_call_sites), only counting
    /// references whose file passes `keep_file`
    pub fn count_call_sites_where(
        &self,
        references: &[Reference],
        declaring_file: &Path,
        keep_file: impl Fn(&Path) -> bool,
    ) -> usize {
        references
            .iter()
            .filter(|reference| {
                let class = self.classify(reference, declaring_file);
                if class != ReferenceClass::CallSite {
                    trace!("{} at {}: {:?}", reference.name, reference.location, class);
                    return false;
                }
                keep_file(&reference.location.file)
            })
            .count()
    }

    /// A protected method that implements an abstract method of its direct
    /// base class; the base class invokes it.
    pub fn is_abstract_override(&self, method: &Declaration) -> bool {
        if method.visibility != Visibility::Protected {
            return false;
        }
        let graph = self.model.graph();
        let Some(class) = method.parent.as_ref().and_then(|id| graph.get_declaration(id)) else {
            return false;
        };
        if class.extends.is_empty() {
            return false;
        }
        // A base class outside the project could declare it abstract
        if graph.has_unresolved_supertype(class, Heritage::Extends) {
            return true;
        }

        graph
            .supertypes(&class.id, Heritage::Extends)
            .into_iter()
            .any(|base| {
                graph.get_children(&base.id).into_iter().any(|member| {
                    member.kind == DeclarationKind::Method
                        && member.is_abstract
                        && member.name == method.name
                })
            })
    }

    /// A method that fulfils a member of an interface its class implements,
    /// directly or through interface inheritance.
    pub fn is_interface_implementation(&self, method: &Declaration) -> bool {
        let graph = self.model.graph();
        let Some(class) = method.parent.as_ref().and_then(|id| graph.get_declaration(id)) else {
            return false;
        };
        if class.implements.is_empty() {
            return false;
        }
        if graph.has_unresolved_supertype(class, Heritage::Implements) {
            return true;
        }

        let contracts = graph.implemented_contracts(&class.id);
        if contracts
            .iter()
            .any(|contract| graph.has_unresolved_supertype(contract, Heritage::Extends))
        {
            return true;
        }

        contracts.into_iter().any(|contract| {
            graph
                .get_children(&contract.id)
                .into_iter()
                .any(|member| member.name == method.name)
        })
    }
}
