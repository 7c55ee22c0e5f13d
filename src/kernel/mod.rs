//! A small kernel for a Martin-Löf type theory fragment.
//!
//! `expr` holds types and terms, `path` the identity types with `refl`, `J`
//! and the operations derived from it, `function` the function algebra and
//! `equiv` the equivalence engine with its univalence conversion.

pub mod def_eq;
pub mod equiv;
pub mod error;
pub mod expr;
pub mod function;
pub mod path;
pub mod reduce;

pub use equiv::{
  Candidate, Equivalence, QuasiInverse, Verdict, is_quasi_inverse,
  prove_equivalence, verify_all,
};
pub use error::{ErrorKind, KernelError, KernelResult, RoundTrip};
pub use expr::{Family, Term, TermData, Type, TypeData};
pub use function::{
  DependentFunction, Function, Mapping, compose_functions, dependent_apply,
  id_function,
};
pub use path::{Path, Proof, ap, j, refl, sym, trans};
