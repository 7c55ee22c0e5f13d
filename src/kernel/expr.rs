//! Types and terms of the kernel.
//!
//! Both are immutable, reference-counted trees. Types are first-class: every
//! [`Type`] can be wrapped as a [`Term`] inhabiting the single universe `U`
//! (levels are not modeled). Comparison lives in `def_eq`, since equality of
//! `Pi` types has to enumerate the domain and can fail.

use std::fmt;
use std::sync::Arc;

use super::equiv::Equivalence;
use super::error::{KernelError, KernelResult};
use super::function::{DependentFunction, Function};
use super::path::Path;

// ============================================================================
// Type families
// ============================================================================

type FamilyFn = dyn Fn(&Term) -> Type + Send + Sync;

/// The codomain of a `Pi` type: a type for every inhabitant of the domain.
#[derive(Clone)]
pub struct Family(Arc<FamilyFn>);

impl Family {
  pub fn new<F>(f: F) -> Self
  where
    F: Fn(&Term) -> Type + Send + Sync + 'static,
  {
    Family(Arc::new(f))
  }

  /// A non-dependent family, `x ↦ ty`.
  pub fn constant(ty: Type) -> Self {
    Family::new(move |_| ty.clone())
  }

  /// The fibre over `x`.
  pub fn at(&self, x: &Term) -> Type {
    (self.0)(x)
  }
}

impl fmt::Debug for Family {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "<family>")
  }
}

// ============================================================================
// Type
// ============================================================================

#[derive(Debug, Clone)]
pub struct Type(pub Arc<TypeData>);

/// The closed set of type formers.
#[derive(Debug)]
pub enum TypeData {
  /// The type with exactly one inhabitant, `star`.
  Unit,
  /// The type with exactly two inhabitants, `true` and `false`.
  Bool,
  /// The universe of types.
  Universe,
  /// Non-dependent function space `A → B`.
  Function(Type, Type),
  /// Dependent function space `Π (x : A), B x`.
  Pi(Type, Family),
  /// Identity type `x =_A y`.
  Identity(Type, Term, Term),
  /// Type of verified equivalences `A ≃ B`.
  Equivalence(Type, Type),
}

impl Type {
  pub fn as_data(&self) -> &TypeData {
    &self.0
  }
  pub fn unit() -> Self {
    Type(Arc::new(TypeData::Unit))
  }
  pub fn bool() -> Self {
    Type(Arc::new(TypeData::Bool))
  }
  pub fn universe() -> Self {
    Type(Arc::new(TypeData::Universe))
  }
  pub fn function(dom: Type, cod: Type) -> Self {
    Type(Arc::new(TypeData::Function(dom, cod)))
  }
  pub fn pi(dom: Type, cod: Family) -> Self {
    Type(Arc::new(TypeData::Pi(dom, cod)))
  }
  pub fn identity(a: Type, x: Term, y: Term) -> Self {
    Type(Arc::new(TypeData::Identity(a, x, y)))
  }
  pub fn equivalence(a: Type, b: Type) -> Self {
    Type(Arc::new(TypeData::Equivalence(a, b)))
  }

  /// Lists every inhabitant of a finite base type.
  ///
  /// Only `Unit` and `Bool` are enumerable; everything else reports
  /// [`KernelError::DomainNotEnumerable`].
  pub fn inhabitants(&self) -> KernelResult<Vec<Term>> {
    match self.as_data() {
      TypeData::Unit => Ok(vec![Term::star()]),
      TypeData::Bool => Ok(vec![Term::tt(), Term::ff()]),
      TypeData::Universe
      | TypeData::Function(..)
      | TypeData::Pi(..)
      | TypeData::Identity(..)
      | TypeData::Equivalence(..) => {
        Err(KernelError::DomainNotEnumerable { domain: self.clone() })
      },
    }
  }

  pub fn is_enumerable(&self) -> bool {
    matches!(self.as_data(), TypeData::Unit | TypeData::Bool)
  }

  /// Checks `t : self`.
  pub fn check(&self, t: &Term) -> KernelResult<()> {
    let found = t.infer();
    if self.def_eq(&found)? {
      Ok(())
    } else {
      Err(KernelError::TypeMismatch { expected: self.clone(), found })
    }
  }

  /// Like [`Type::def_eq`], but a mismatch is an error.
  pub fn assert_def_eq(&self, other: &Type) -> KernelResult<()> {
    if self.def_eq(other)? {
      Ok(())
    } else {
      Err(KernelError::TypeMismatch {
        expected: self.clone(),
        found: other.clone(),
      })
    }
  }
}

// ============================================================================
// Term
// ============================================================================

#[derive(Debug, Clone)]
pub struct Term(pub Arc<TermData>);

#[derive(Debug)]
pub enum TermData {
  /// The inhabitant of `Unit`.
  Star,
  /// An inhabitant of `Bool`.
  Bool(bool),
  /// A type, as an inhabitant of the universe.
  Type(Type),
  Fun(Function),
  DepFun(DependentFunction),
  /// Evidence of an identity.
  Path(Path),
  Equiv(Equivalence),
}

impl Term {
  pub fn as_data(&self) -> &TermData {
    &self.0
  }
  pub fn star() -> Self {
    Term(Arc::new(TermData::Star))
  }
  pub fn bool(b: bool) -> Self {
    Term(Arc::new(TermData::Bool(b)))
  }
  pub fn tt() -> Self {
    Term::bool(true)
  }
  pub fn ff() -> Self {
    Term::bool(false)
  }
  pub fn typ(t: Type) -> Self {
    Term(Arc::new(TermData::Type(t)))
  }
  pub fn fun(f: Function) -> Self {
    Term(Arc::new(TermData::Fun(f)))
  }
  pub fn dep_fun(f: DependentFunction) -> Self {
    Term(Arc::new(TermData::DepFun(f)))
  }
  pub fn path(p: Path) -> Self {
    Term(Arc::new(TermData::Path(p)))
  }
  pub fn equiv(e: Equivalence) -> Self {
    Term(Arc::new(TermData::Equiv(e)))
  }

  pub fn as_bool(&self) -> Option<bool> {
    match self.as_data() {
      TermData::Bool(b) => Some(*b),
      _ => None,
    }
  }

  pub fn as_type(&self) -> Option<&Type> {
    match self.as_data() {
      TermData::Type(t) => Some(t),
      _ => None,
    }
  }

  pub fn as_path(&self) -> Option<&Path> {
    match self.as_data() {
      TermData::Path(p) => Some(p),
      _ => None,
    }
  }

  pub fn as_fun(&self) -> Option<&Function> {
    match self.as_data() {
      TermData::Fun(f) => Some(f),
      _ => None,
    }
  }

  /// The type this term was built at. Every term carries enough information
  /// to recover it, so inference never fails.
  pub fn infer(&self) -> Type {
    match self.as_data() {
      TermData::Star => Type::unit(),
      TermData::Bool(_) => Type::bool(),
      TermData::Type(_) => Type::universe(),
      TermData::Fun(f) => {
        Type::function(f.domain().clone(), f.codomain().clone())
      },
      TermData::DepFun(f) => f.pi_type().clone(),
      TermData::Path(p) => {
        Type::identity(p.ty().clone(), p.source().clone(), p.target().clone())
      },
      TermData::Equiv(e) => Type::equivalence(e.a().clone(), e.b().clone()),
    }
  }
}

impl From<Type> for Term {
  fn from(t: Type) -> Self {
    Term::typ(t)
  }
}

impl From<bool> for Term {
  fn from(b: bool) -> Self {
    Term::bool(b)
  }
}

// ============================================================================
// Display
// ============================================================================

impl fmt::Display for Type {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.as_data() {
      TypeData::Unit => write!(f, "Unit"),
      TypeData::Bool => write!(f, "Bool"),
      TypeData::Universe => write!(f, "U"),
      TypeData::Function(a, b) => write!(f, "({a} → {b})"),
      TypeData::Pi(a, _) => write!(f, "(Π {a}, _)"),
      TypeData::Identity(a, x, y) => write!(f, "({x} =[{a}] {y})"),
      TypeData::Equivalence(a, b) => write!(f, "({a} ≃ {b})"),
    }
  }
}

impl fmt::Display for Term {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.as_data() {
      TermData::Star => write!(f, "star"),
      TermData::Bool(b) => write!(f, "{b}"),
      TermData::Type(t) => write!(f, "{t}"),
      TermData::Fun(fun) => {
        write!(f, "<fn {} → {}>", fun.domain(), fun.codomain())
      },
      TermData::DepFun(fun) => write!(f, "<fn {}>", fun.pi_type()),
      TermData::Path(p) => write!(f, "{p}"),
      TermData::Equiv(e) => write!(f, "<equiv {} ≃ {}>", e.a(), e.b()),
    }
  }
}
