//! Definitional equality of types, terms, functions and paths.

use std::sync::Arc;

use super::equiv::Equivalence;
use super::error::KernelResult;
use super::expr::{Term, TermData, Type, TypeData};
use super::function::Function;
use super::path::{Path, Proof};
use super::reduce::normalize;

impl Type {
  /// Structural equality of types.
  ///
  /// `Pi` types are compared fibrewise over their domain, which therefore has
  /// to be enumerable; otherwise this reports
  /// [`KernelError::DomainNotEnumerable`](super::error::KernelError) instead
  /// of guessing.
  pub fn def_eq(&self, other: &Type) -> KernelResult<bool> {
    if Arc::ptr_eq(&self.0, &other.0) {
      return Ok(true);
    }
    match (self.as_data(), other.as_data()) {
      (TypeData::Unit, TypeData::Unit)
      | (TypeData::Bool, TypeData::Bool)
      | (TypeData::Universe, TypeData::Universe) => Ok(true),
      (TypeData::Function(d1, c1), TypeData::Function(d2, c2))
      | (TypeData::Equivalence(d1, c1), TypeData::Equivalence(d2, c2)) => {
        Ok(d1.def_eq(d2)? && c1.def_eq(c2)?)
      },
      (TypeData::Pi(d1, b1), TypeData::Pi(d2, b2)) => {
        if !d1.def_eq(d2)? {
          return Ok(false);
        }
        for x in d1.inhabitants()? {
          if !b1.at(&x).def_eq(&b2.at(&x))? {
            return Ok(false);
          }
        }
        Ok(true)
      },
      (TypeData::Identity(a1, x1, y1), TypeData::Identity(a2, x2, y2)) => {
        Ok(a1.def_eq(a2)? && x1.def_eq(x2)? && y1.def_eq(y2)?)
      },
      _ => Ok(false),
    }
  }
}

impl Term {
  /// Structural equality of terms: value equality on base inhabitants,
  /// delegated comparison for everything else.
  pub fn def_eq(&self, other: &Term) -> KernelResult<bool> {
    if Arc::ptr_eq(&self.0, &other.0) {
      return Ok(true);
    }
    match (self.as_data(), other.as_data()) {
      (TermData::Star, TermData::Star) => Ok(true),
      (TermData::Bool(a), TermData::Bool(b)) => Ok(a == b),
      (TermData::Type(a), TermData::Type(b)) => a.def_eq(b),
      (TermData::Fun(f), TermData::Fun(g)) => f.def_eq(g),
      (TermData::DepFun(f), TermData::DepFun(g)) => {
        f.pi_type().def_eq(g.pi_type())
      },
      (TermData::Path(p), TermData::Path(q)) => p.def_eq(q),
      (TermData::Equiv(e), TermData::Equiv(d)) => e.def_eq(d),
      _ => Ok(false),
    }
  }
}

impl Function {
  /// Functions are identified by their domain and codomain only.
  /// Extensional equality is undecidable in general, so this is a
  /// type-level approximation; round-trip checks apply the real mappings.
  pub fn def_eq(&self, other: &Function) -> KernelResult<bool> {
    Ok(
      self.domain().def_eq(other.domain())?
        && self.codomain().def_eq(other.codomain())?,
    )
  }
}

impl Equivalence {
  pub fn def_eq(&self, other: &Equivalence) -> KernelResult<bool> {
    let (l, r) = (self.quasi_inverse(), other.quasi_inverse());
    Ok(
      self.a().def_eq(other.a())?
        && self.b().def_eq(other.b())?
        && l.f().def_eq(r.f())?
        && l.g().def_eq(r.g())?,
    )
  }
}

impl Path {
  /// Two paths are equal when they connect equal endpoints in equal types
  /// and their derivations agree after normalization.
  pub fn def_eq(&self, other: &Path) -> KernelResult<bool> {
    if !(self.ty().def_eq(other.ty())?
      && self.source().def_eq(other.source())?
      && self.target().def_eq(other.target())?)
    {
      return Ok(false);
    }
    let l = normalize(self)?;
    let r = normalize(other)?;
    proof_eq(l.proof(), r.proof())
  }
}

fn proof_eq(l: &Proof, r: &Proof) -> KernelResult<bool> {
  match (l, r) {
    (Proof::Refl, Proof::Refl) => Ok(true),
    (Proof::Univalence(e), Proof::Univalence(d)) => e.def_eq(d),
    _ => Ok(false),
  }
}
