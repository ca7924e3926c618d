//! Tag dispatch resolution
//!
//! Picks the implementation of an operation for the tags of its arguments:
//! the unique most specific applicable entry, else an entry applicable once
//! the arguments are converted to their common datatype, else the
//! operation's default for that arity.

pub mod specificity;

use crate::error::{ElabResult, ElaborationError};
use crate::registry::{join_display, DefaultImplementation, DispatchRegistry, Implementation, ImplementationEntry};
use crate::types::{OperationTag, Tag};
use specificity::{find_most_specific, is_applicable};

/// How an operation was resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionKind {
    /// A registered entry matched the argument tags directly
    Entry,
    /// An entry matched after converting every argument to this tag
    CommonDatatype(Tag),
    /// The operation's default for this arity
    Default,
}

#[derive(Debug, Clone)]
pub struct Resolution {
    pub label: String,
    pub body: Implementation,
    pub kind: ResolutionKind,
}

#[derive(Debug, Clone)]
pub enum DispatchResult {
    Resolved(Resolution),
    NoMatch {
        operation: OperationTag,
        tags: Vec<Tag>,
    },
    Unsupported {
        operation: OperationTag,
        tags: Vec<Tag>,
        message: String,
    },
    Ambiguous {
        operation: OperationTag,
        tags: Vec<Tag>,
        candidates: Vec<String>,
    },
}

impl DispatchResult {
    pub fn into_result(self) -> ElabResult<Resolution> {
        match self {
            DispatchResult::Resolved(resolution) => Ok(resolution),
            DispatchResult::NoMatch { operation, tags } => Err(ElaborationError::NoImplementation {
                operation: operation.to_string(),
                tags: join_display(&tags),
            }),
            DispatchResult::Unsupported {
                operation,
                tags,
                message,
            } => Err(ElaborationError::Unsupported {
                operation: operation.to_string(),
                tags: join_display(&tags),
                message,
            }),
            DispatchResult::Ambiguous {
                operation,
                tags,
                candidates,
            } => Err(ElaborationError::Ambiguous {
                operation: operation.to_string(),
                tags: join_display(&tags),
                candidates,
            }),
        }
    }

    /// Whether a registered entry (not a default) handles the call
    pub fn is_entry(&self) -> bool {
        matches!(
            self,
            DispatchResult::Resolved(Resolution {
                kind: ResolutionKind::Entry | ResolutionKind::CommonDatatype(_),
                ..
            })
        )
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            DispatchResult::Resolved(resolution) => Some(&resolution.label),
            _ => None,
        }
    }
}

enum EntrySelection<'e> {
    Found(&'e ImplementationEntry),
    Ambiguous(Vec<String>),
    None,
}

pub struct DispatchResolver<'a> {
    registry: &'a DispatchRegistry,
}

impl<'a> DispatchResolver<'a> {
    pub fn new(registry: &'a DispatchRegistry) -> Self {
        Self { registry }
    }

    /// Resolve `operation` for arguments tagged `tags`
    pub fn resolve(&self, operation: &OperationTag, tags: &[Tag]) -> DispatchResult {
        let entries = self.registry.entries(operation);

        // Step 1: most specific applicable entry
        match self.select(entries, tags) {
            EntrySelection::Found(entry) => {
                return DispatchResult::Resolved(Resolution {
                    label: entry.label.clone(),
                    body: entry.body.clone(),
                    kind: ResolutionKind::Entry,
                })
            }
            EntrySelection::Ambiguous(candidates) => {
                return DispatchResult::Ambiguous {
                    operation: operation.clone(),
                    tags: tags.to_vec(),
                    candidates,
                }
            }
            EntrySelection::None => {}
        }

        // Step 2: retry with every argument converted to the common datatype
        if let Some(common) = self.common_datatype(tags) {
            let unified = vec![common.clone(); tags.len()];
            match self.select(entries, &unified) {
                EntrySelection::Found(entry) => {
                    return DispatchResult::Resolved(Resolution {
                        label: entry.label.clone(),
                        body: entry.body.clone(),
                        kind: ResolutionKind::CommonDatatype(common),
                    })
                }
                EntrySelection::Ambiguous(candidates) => {
                    return DispatchResult::Ambiguous {
                        operation: operation.clone(),
                        tags: tags.to_vec(),
                        candidates,
                    }
                }
                EntrySelection::None => {}
            }
        }

        // Step 3: the operation's default
        match self.registry.default_for(operation, tags.len()) {
            Some(DefaultImplementation::Body { label, body }) => {
                DispatchResult::Resolved(Resolution {
                    label: label.clone(),
                    body: body.clone(),
                    kind: ResolutionKind::Default,
                })
            }
            Some(DefaultImplementation::Fail { message }) => DispatchResult::Unsupported {
                operation: operation.clone(),
                tags: tags.to_vec(),
                message: message.clone(),
            },
            None => DispatchResult::NoMatch {
                operation: operation.clone(),
                tags: tags.to_vec(),
            },
        }
    }

    fn select<'e>(&self, entries: &'e [ImplementationEntry], tags: &[Tag]) -> EntrySelection<'e> {
        let applicable: Vec<&ImplementationEntry> = entries
            .iter()
            .filter(|entry| is_applicable(self.registry, &entry.pattern, tags))
            .collect();

        if applicable.is_empty() {
            return EntrySelection::None;
        }

        let most_specific = find_most_specific(self.registry, &applicable);
        match most_specific.as_slice() {
            [entry] => EntrySelection::Found(*entry),
            candidates => {
                EntrySelection::Ambiguous(candidates.iter().map(|entry| entry.label.clone()).collect())
            }
        }
    }

    /// Common datatype of mixed argument tags, if one was declared
    fn common_datatype(&self, tags: &[Tag]) -> Option<Tag> {
        let (first, rest) = tags.split_first()?;
        if rest.is_empty() || rest.iter().all(|tag| tag == first) {
            return None;
        }
        rest.iter().try_fold(first.clone(), |common, tag| {
            self.registry.common_datatype(&common, tag)
        })
    }
}
