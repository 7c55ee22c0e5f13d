//! Equivalences between types built from quasi-inverse pairs.
//!
//! The round-trip laws are checked by exhaustive enumeration, which only
//! works for the finite base types. Three shapes are supported:
//!
//! - `Unit ↔ Unit` and `Bool ↔ Bool`: both round trips are checked on every
//!   inhabitant.
//! - `Unit → Bool` with `Bool → Unit`: `g(f(star)) = star` is checked, and the
//!   other direction only asks that `f(g(true)) = f(g(false))`. This is a
//!   deliberately weak check for a pair where one direction cannot be
//!   injective; an equivalence accepted this way does NOT satisfy
//!   `f(g(y)) = y` for every `y`.
//!
//! Every other shape is rejected with
//! [`KernelError::UnsupportedShape`]; there is no general decision procedure.

use std::sync::Arc;

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::debug;

use super::error::{KernelError, KernelResult, RoundTrip};
use super::expr::{Term, Type, TypeData};
use super::function::Function;
use super::path::{Path, Proof};

/// A pair of functions `f : A → B`, `g : B → A` together with the witness
/// families `eta` and `epsilon`.
#[derive(Debug, Clone)]
pub struct QuasiInverse {
  f: Function,
  g: Function,
}

impl QuasiInverse {
  pub fn f(&self) -> &Function {
    &self.f
  }
  pub fn g(&self) -> &Function {
    &self.g
  }

  /// `eta(x) = Identity(A, x, g(f(x)))`.
  pub fn eta(&self, x: &Term) -> KernelResult<Type> {
    let gfx = self.g.apply(&self.f.apply(x)?)?;
    Ok(Type::identity(self.f.domain().clone(), x.clone(), gfx))
  }

  /// `epsilon(y) = Identity(B, f(g(y)), y)`.
  pub fn epsilon(&self, y: &Term) -> KernelResult<Type> {
    let fgy = self.f.apply(&self.g.apply(y)?)?;
    Ok(Type::identity(self.g.domain().clone(), fgy, y.clone()))
  }
}

/// Evidence that `a` and `b` are equivalent. Only [`prove_equivalence`]
/// creates one.
#[derive(Debug, Clone)]
pub struct Equivalence {
  a: Type,
  b: Type,
  quasi_inverse: QuasiInverse,
}

impl Equivalence {
  pub fn a(&self) -> &Type {
    &self.a
  }
  pub fn b(&self) -> &Type {
    &self.b
  }
  pub fn quasi_inverse(&self) -> &QuasiInverse {
    &self.quasi_inverse
  }

  /// Univalence: the path `a = b` in the universe.
  ///
  /// This is a postulate. It is not derived from `J` and leaves the identity
  /// fragment of the kernel: it is the only way to obtain a path between two
  /// distinct types. The resulting path records [`Proof::Univalence`], so it
  /// can be recognized, and `J` refuses to eliminate it.
  pub fn to_path(&self) -> Path {
    Path::derived(
      Type::universe(),
      Term::typ(self.a.clone()),
      Term::typ(self.b.clone()),
      Proof::Univalence(Arc::new(self.clone())),
    )
  }
}

// ============================================================================
// Round-trip checks
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
  UnitUnit,
  BoolBool,
  UnitBool,
}

fn shape(f: &Function, g: &Function) -> KernelResult<Shape> {
  use TypeData::{Bool, Unit};
  let data = (
    f.domain().as_data(),
    f.codomain().as_data(),
    g.domain().as_data(),
    g.codomain().as_data(),
  );
  match data {
    (Unit, Unit, Unit, Unit) => Ok(Shape::UnitUnit),
    (Bool, Bool, Bool, Bool) => Ok(Shape::BoolBool),
    (Unit, Bool, Bool, Unit) => Ok(Shape::UnitBool),
    _ => Err(KernelError::UnsupportedShape {
      domain: f.domain().clone(),
      codomain: f.codomain().clone(),
    }),
  }
}

/// Checks `g(f(x)) = x` on every `x` in `f`'s domain.
fn check_eta(f: &Function, g: &Function) -> KernelResult<Option<KernelError>> {
  for x in f.domain().inhabitants()? {
    let image = g.apply(&f.apply(&x)?)?;
    if !image.def_eq(&x)? {
      return Ok(Some(KernelError::QuasiInverseViolation {
        direction: RoundTrip::Eta,
        witness: x,
        image,
      }));
    }
  }
  Ok(None)
}

/// Checks `f(g(y)) = y` on every `y` in `g`'s domain.
fn check_epsilon(
  f: &Function,
  g: &Function,
) -> KernelResult<Option<KernelError>> {
  for y in g.domain().inhabitants()? {
    let image = f.apply(&g.apply(&y)?)?;
    if !image.def_eq(&y)? {
      return Ok(Some(KernelError::QuasiInverseViolation {
        direction: RoundTrip::Epsilon,
        witness: y,
        image,
      }));
    }
  }
  Ok(None)
}

/// The degenerate `Bool → Unit → Bool` direction: all round trips must agree
/// with each other, not with their input.
fn check_epsilon_constant(
  f: &Function,
  g: &Function,
) -> KernelResult<Option<KernelError>> {
  let mut first: Option<Term> = None;
  for y in g.domain().inhabitants()? {
    let image = f.apply(&g.apply(&y)?)?;
    match &first {
      None => first = Some(image),
      Some(expected) => {
        if !image.def_eq(expected)? {
          return Ok(Some(KernelError::QuasiInverseViolation {
            direction: RoundTrip::Epsilon,
            witness: y,
            image,
          }));
        }
      },
    }
  }
  Ok(None)
}

/// Finds the first round-trip failure of `(f, g)`, if any.
fn round_trip_violation(
  f: &Function,
  g: &Function,
) -> KernelResult<Option<KernelError>> {
  let violation = match shape(f, g)? {
    Shape::UnitUnit | Shape::BoolBool => match check_eta(f, g)? {
      None => check_epsilon(f, g)?,
      found => found,
    },
    Shape::UnitBool => match check_eta(f, g)? {
      None => check_epsilon_constant(f, g)?,
      found => found,
    },
  };
  Ok(violation)
}

/// Whether `f` and `g` undo each other on the supported finite shapes.
pub fn is_quasi_inverse(f: &Function, g: &Function) -> KernelResult<bool> {
  Ok(round_trip_violation(f, g)?.is_none())
}

/// Verifies `f : A → B` and `g : B → A` as quasi-inverses and packages them
/// as an [`Equivalence`].
pub fn prove_equivalence(
  a: &Type,
  b: &Type,
  f: &Function,
  g: &Function,
) -> KernelResult<Equivalence> {
  a.assert_def_eq(f.domain())?;
  b.assert_def_eq(f.codomain())?;
  b.assert_def_eq(g.domain())?;
  a.assert_def_eq(g.codomain())?;
  if let Some(violation) = round_trip_violation(f, g)? {
    debug!(%a, %b, reason = %violation, "equivalence rejected");
    return Err(violation);
  }
  debug!(%a, %b, "equivalence verified");
  Ok(Equivalence {
    a: a.clone(),
    b: b.clone(),
    quasi_inverse: QuasiInverse { f: f.clone(), g: g.clone() },
  })
}

// ============================================================================
// Verification requests
// ============================================================================

/// An unverified equivalence request.
#[derive(Debug, Clone)]
pub struct Candidate {
  pub a: Type,
  pub b: Type,
  pub f: Function,
  pub g: Function,
}

/// Outcome of verifying a [`Candidate`]. Both states are terminal; only a
/// verified equivalence can be turned into a path.
#[derive(Debug, Clone)]
pub enum Verdict {
  Verified(Equivalence),
  Rejected(KernelError),
}

impl Candidate {
  pub fn new(a: Type, b: Type, f: Function, g: Function) -> Self {
    Candidate { a, b, f, g }
  }

  pub fn verify(&self) -> Verdict {
    match prove_equivalence(&self.a, &self.b, &self.f, &self.g) {
      Ok(e) => Verdict::Verified(e),
      Err(e) => Verdict::Rejected(e),
    }
  }
}

impl Verdict {
  pub fn is_verified(&self) -> bool {
    matches!(self, Verdict::Verified(_))
  }

  pub fn into_result(self) -> KernelResult<Equivalence> {
    match self {
      Verdict::Verified(e) => Ok(e),
      Verdict::Rejected(e) => Err(e),
    }
  }
}

/// Verifies independent candidates in parallel. Results keep input order.
pub fn verify_all(candidates: &[Candidate]) -> Vec<Verdict> {
  candidates.par_iter().map(Candidate::verify).collect()
}
