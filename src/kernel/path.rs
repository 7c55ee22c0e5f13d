//! Identity evidence and path induction.
//!
//! A [`Path`] can only come out of [`refl`], out of [`j`] (and the operations
//! defined through it), or out of the univalence postulate
//! ([`Equivalence::to_path`]). Its fields are private so a path between two
//! arbitrary terms cannot be fabricated. Every path remembers how it was
//! built ([`Proof`]); `j` uses that record to reduce the path back to the
//! `refl` it came from.
//!
//! The groupoid laws (`sym (sym p) = p`, the `trans` unit laws, `ap id p = p`,
//! `ap g (ap f p) = ap (g ∘ f) p`) therefore hold for every path derived from
//! `refl`, where both sides reduce to the same leaf. A postulated path has no
//! leaf: [`sym`] and [`ap`] on it, and [`trans`] with it on the right, report
//! [`KernelError::NonReflexivePath`]. Only `trans(ua, refl)` is accepted.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use super::equiv::Equivalence;
use super::error::{KernelError, KernelResult};
use super::expr::{Term, Type};
use super::function::Function;
use super::reduce::refl_leaf;

/// How a path was derived.
#[derive(Debug, Clone)]
pub enum Proof {
  /// `refl(A, a)`, the only primitive constructor.
  Refl,
  /// Produced by [`sym`].
  Sym(Arc<Path>),
  /// Produced by [`trans`] from `p : x = y` and `q : y = z`.
  Trans(Arc<Path>, Arc<Path>),
  /// Produced by [`ap`].
  Ap(Function, Arc<Path>),
  /// Postulated: a path in the universe obtained from a verified
  /// equivalence. It has no `refl` underneath, so `j` cannot eliminate it.
  Univalence(Arc<Equivalence>),
}

/// Evidence that `source` and `target` are identified in `ty`.
#[derive(Debug, Clone)]
pub struct Path {
  ty: Type,
  source: Term,
  target: Term,
  proof: Proof,
}

impl Path {
  /// Builds a path whose well-formedness the caller has already established.
  pub(crate) fn derived(
    ty: Type,
    source: Term,
    target: Term,
    proof: Proof,
  ) -> Self {
    Path { ty, source, target, proof }
  }

  pub fn ty(&self) -> &Type {
    &self.ty
  }
  pub fn source(&self) -> &Term {
    &self.source
  }
  pub fn target(&self) -> &Term {
    &self.target
  }
  pub fn proof(&self) -> &Proof {
    &self.proof
  }

  /// Whether this path was built directly by `refl`.
  pub fn is_refl(&self) -> bool {
    matches!(self.proof, Proof::Refl)
  }

  /// Whether this path rests on the univalence postulate anywhere in its
  /// derivation.
  pub fn is_postulated(&self) -> bool {
    match &self.proof {
      Proof::Refl => false,
      Proof::Univalence(_) => true,
      Proof::Sym(p) | Proof::Ap(_, p) => p.is_postulated(),
      Proof::Trans(p, q) => p.is_postulated() || q.is_postulated(),
    }
  }
}

impl fmt::Display for Path {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.proof {
      Proof::Refl => write!(f, "(refl {})", self.source),
      Proof::Sym(p) => write!(f, "(sym {p})"),
      Proof::Trans(p, q) => write!(f, "(trans {p} {q})"),
      Proof::Ap(fun, p) => {
        write!(f, "(ap <fn {} → {}> {p})", fun.domain(), fun.codomain())
      },
      Proof::Univalence(e) => write!(f, "(ua {} ≃ {})", e.a(), e.b()),
    }
  }
}

// ============================================================================
// Constructors and the eliminator
// ============================================================================

/// The reflexivity path at `a : A`.
pub fn refl(a_ty: &Type, a: &Term) -> KernelResult<Path> {
  a_ty.check(a)?;
  Ok(Path::derived(a_ty.clone(), a.clone(), a.clone(), Proof::Refl))
}

/// Path induction.
///
/// Given a motive `C(x, y, p)`, a base case `d(a) : C(a, a, refl a)` and a
/// path `p : x =_A y`, returns a term of `C(x, y, p)`. The path is first
/// reduced to the `refl(A, a)` it was derived from; the result is then
/// exactly `d(a)`, so `J(A, C, d, a, a, refl a) = d(a)` holds on the nose.
pub fn j<C, D>(
  a_ty: &Type,
  motive: C,
  base: D,
  x: &Term,
  y: &Term,
  p: &Path,
) -> KernelResult<Term>
where
  C: Fn(&Term, &Term, &Path) -> KernelResult<Type>,
  D: Fn(&Term) -> KernelResult<Term>,
{
  a_ty.assert_def_eq(p.ty())?;
  if !p.source().def_eq(x)? {
    return Err(KernelError::EndpointMismatch {
      expected: p.source().clone(),
      found: x.clone(),
    });
  }
  if !p.target().def_eq(y)? {
    return Err(KernelError::EndpointMismatch {
      expected: p.target().clone(),
      found: y.clone(),
    });
  }

  let leaf = refl_leaf(p)?;
  let at_leaf = refl(a_ty, &leaf)?;
  trace!(path = %p, leaf = %leaf, "J reduced to refl");

  let result = base(&leaf)?;
  let found = result.infer();
  let at_refl = motive(&leaf, &leaf, &at_leaf)?;
  if !at_refl.def_eq(&found)? {
    return Err(KernelError::IllTypedMotive { expected: at_refl, found });
  }
  let at_p = motive(x, y, p)?;
  if !at_p.def_eq(&found)? {
    return Err(KernelError::IllTypedMotive { expected: at_p, found });
  }
  Ok(result)
}

/// Extracts the path returned by an eliminator whose motive is an identity
/// type.
fn expect_path(t: Term, expected: Type) -> KernelResult<Path> {
  match t.as_path() {
    Some(p) => Ok(p.clone()),
    None => Err(KernelError::IllTypedMotive { expected, found: t.infer() }),
  }
}

// ============================================================================
// Derived operations
// ============================================================================

/// `sym : x = y → y = x`, by induction on `p` with base case `refl`.
pub fn sym(a_ty: &Type, x: &Term, y: &Term, p: &Path) -> KernelResult<Path> {
  let out = j(
    a_ty,
    |u, v, _| Ok(Type::identity(a_ty.clone(), v.clone(), u.clone())),
    |z| Ok(Term::path(refl(a_ty, z)?)),
    x,
    y,
    p,
  )?;
  expect_path(out, Type::identity(a_ty.clone(), y.clone(), x.clone()))?;
  Ok(Path::derived(
    a_ty.clone(),
    y.clone(),
    x.clone(),
    Proof::Sym(Arc::new(p.clone())),
  ))
}

/// `trans : x = y → y = z → x = z`, by induction on `q`; the base case
/// returns `p` itself.
pub fn trans(
  a_ty: &Type,
  x: &Term,
  y: &Term,
  z: &Term,
  p: &Path,
  q: &Path,
) -> KernelResult<Path> {
  let out = j(
    a_ty,
    |_, w, _| Ok(Type::identity(a_ty.clone(), x.clone(), w.clone())),
    |_| Ok(Term::path(p.clone())),
    y,
    z,
    q,
  )?;
  expect_path(out, Type::identity(a_ty.clone(), x.clone(), z.clone()))?;
  Ok(Path::derived(
    a_ty.clone(),
    x.clone(),
    z.clone(),
    Proof::Trans(Arc::new(p.clone()), Arc::new(q.clone())),
  ))
}

/// Congruence: `ap f : x = y → f x = f y`, by induction on `p` with base
/// case `refl(B, f a)`.
pub fn ap(f: &Function, p: &Path) -> KernelResult<Path> {
  let a_ty = f.domain();
  let b_ty = f.codomain();
  let out = j(
    a_ty,
    |u, v, _| Ok(Type::identity(b_ty.clone(), f.apply(u)?, f.apply(v)?)),
    |a| Ok(Term::path(refl(b_ty, &f.apply(a)?)?)),
    p.source(),
    p.target(),
    p,
  )?;
  let fx = f.apply(p.source())?;
  let fy = f.apply(p.target())?;
  expect_path(out, Type::identity(b_ty.clone(), fx.clone(), fy.clone()))?;
  Ok(Path::derived(
    b_ty.clone(),
    fx,
    fy,
    Proof::Ap(f.clone(), Arc::new(p.clone())),
  ))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::kernel::equiv::prove_equivalence;
  use crate::kernel::error::ErrorKind;
  use crate::kernel::function::{compose_functions, id_function};
  use quickcheck::{Arbitrary, Gen};

  fn negate() -> Function {
    Function::from_fn(Type::bool(), Type::bool(), |x| {
      Ok(Term::bool(!x.as_bool().unwrap_or_default()))
    })
    .unwrap()
  }

  fn to_unit() -> Function {
    Function::constant(Type::bool(), Type::unit(), Term::star()).unwrap()
  }

  /// A closed path over `Bool`, built from `refl` through a random chain of
  /// derived operations.
  #[derive(Clone, Debug)]
  struct ArbPath(Path);

  fn arb_path(g: &mut Gen, depth: usize) -> Path {
    let bool_ty = Type::bool();
    if depth == 0 {
      return refl(&bool_ty, &Term::bool(bool::arbitrary(g))).unwrap();
    }
    match usize::arbitrary(g) % 4 {
      0 => {
        let p = arb_path(g, depth - 1);
        sym(&bool_ty, p.source(), p.target(), &p).unwrap()
      },
      1 => {
        let p = arb_path(g, depth - 1);
        let q = refl(&bool_ty, p.target()).unwrap();
        trans(&bool_ty, p.source(), p.target(), p.target(), &p, &q).unwrap()
      },
      2 => ap(&negate(), &arb_path(g, depth - 1)).unwrap(),
      3 => ap(&id_function(&bool_ty), &arb_path(g, depth - 1)).unwrap(),
      _ => unreachable!(),
    }
  }

  impl Arbitrary for ArbPath {
    fn arbitrary(g: &mut Gen) -> Self {
      let depth = usize::arbitrary(g) % 5;
      ArbPath(arb_path(g, depth))
    }
  }

  #[test]
  fn test_j_computes_on_refl() {
    for a in Type::bool().inhabitants().unwrap() {
      let p = refl(&Type::bool(), &a).unwrap();
      let out = j(
        &Type::bool(),
        |_, _, _| Ok(Type::bool()),
        |z| Ok(Term::bool(!z.as_bool().unwrap())),
        &a,
        &a,
        &p,
      )
      .unwrap();
      assert_eq!(out.as_bool(), Some(!a.as_bool().unwrap()));
    }
  }

  fn ua_unit_bool() -> Path {
    let f = Function::constant(Type::unit(), Type::bool(), Term::tt()).unwrap();
    let g =
      Function::constant(Type::bool(), Type::unit(), Term::star()).unwrap();
    prove_equivalence(&Type::unit(), &Type::bool(), &f, &g)
      .unwrap()
      .to_path()
  }

  #[test]
  fn test_j_computes_on_unit() {
    let unit = Type::unit();
    let p = refl(&unit, &Term::star()).unwrap();
    let out = j(
      &unit,
      |_, _, _| Ok(Type::bool()),
      |_| Ok(Term::ff()),
      &Term::star(),
      &Term::star(),
      &p,
    )
    .unwrap();
    assert_eq!(out.as_bool(), Some(false));
  }

  #[test]
  fn test_j_computes_on_universe() {
    let u = Type::universe();
    let bool_term = Term::typ(Type::bool());
    let p = refl(&u, &bool_term).unwrap();
    let out = j(
      &u,
      |x, y, _| Ok(Type::identity(u.clone(), x.clone(), y.clone())),
      |z| Ok(Term::path(refl(&u, z)?)),
      &bool_term,
      &bool_term,
      &p,
    )
    .unwrap();
    let r = out.as_path().unwrap();
    assert!(r.is_refl());
    assert!(r.def_eq(&p).unwrap());
    assert!(r.source().def_eq(&bool_term).unwrap());
  }

  #[test]
  fn test_derived_operations_reject_postulated_paths() {
    let ua = ua_unit_bool();
    let u = Type::universe();
    let (x, y) = (ua.source().clone(), ua.target().clone());

    let err = sym(&u, &x, &y, &ua).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EliminatorPrecondition);
    assert!(matches!(err, KernelError::NonReflexivePath { .. }));

    let rx = refl(&u, &x).unwrap();
    let err = trans(&u, &x, &x, &y, &rx, &ua).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EliminatorPrecondition);

    let to_u = id_function(&u);
    let err = ap(&to_u, &ua).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EliminatorPrecondition);

    // the postulate may still be followed by refl
    let ry = refl(&u, &y).unwrap();
    let t = trans(&u, &x, &y, &y, &ua, &ry).unwrap();
    assert!(t.is_postulated());
    assert!(t.def_eq(&ua).unwrap());
  }

  #[test]
  fn test_j_rejects_ill_typed_base_case() {
    let p = refl(&Type::bool(), &Term::tt()).unwrap();
    let err = j(
      &Type::bool(),
      |_, _, _| Ok(Type::bool()),
      |_| Ok(Term::star()),
      &Term::tt(),
      &Term::tt(),
      &p,
    )
    .unwrap_err();
    assert!(matches!(err, KernelError::IllTypedMotive { .. }));
  }

  #[test]
  fn test_j_rejects_wrong_endpoints() {
    let p = refl(&Type::bool(), &Term::tt()).unwrap();
    let err = j(
      &Type::bool(),
      |_, _, _| Ok(Type::unit()),
      |_| Ok(Term::star()),
      &Term::tt(),
      &Term::ff(),
      &p,
    )
    .unwrap_err();
    assert!(matches!(err, KernelError::EndpointMismatch { .. }));
  }

  #[test]
  fn test_j_rejects_wrong_carrier() {
    let p = refl(&Type::bool(), &Term::tt()).unwrap();
    let err = j(
      &Type::unit(),
      |_, _, _| Ok(Type::unit()),
      |_| Ok(Term::star()),
      &Term::tt(),
      &Term::tt(),
      &p,
    )
    .unwrap_err();
    assert!(matches!(err, KernelError::TypeMismatch { .. }));
  }

  #[test]
  fn test_j_recurses_through_derived_paths() {
    let bool_ty = Type::bool();
    let p = refl(&bool_ty, &Term::ff()).unwrap();
    let p = sym(&bool_ty, &Term::ff(), &Term::ff(), &p).unwrap();
    let p = ap(&negate(), &p).unwrap();
    assert!(p.source().def_eq(&Term::tt()).unwrap());
    let out = j(
      &bool_ty,
      |_, _, _| Ok(Type::bool()),
      |z| Ok(z.clone()),
      &Term::tt(),
      &Term::tt(),
      &p,
    )
    .unwrap();
    assert_eq!(out.as_bool(), Some(true));
  }

  #[test]
  fn test_refl_checks_membership() {
    let err = refl(&Type::unit(), &Term::tt()).unwrap_err();
    assert!(matches!(err, KernelError::TypeMismatch { .. }));
  }

  #[test]
  fn test_sym_swaps_endpoints() {
    let bool_ty = Type::bool();
    let p = refl(&bool_ty, &Term::tt()).unwrap();
    let s = sym(&bool_ty, &Term::tt(), &Term::tt(), &p).unwrap();
    assert!(matches!(s.proof(), Proof::Sym(_)));
    assert_eq!(s.to_string(), "(sym (refl true))");
  }

  #[test]
  fn test_ap_changes_carrier() {
    let p = refl(&Type::bool(), &Term::ff()).unwrap();
    let q = ap(&to_unit(), &p).unwrap();
    assert!(q.ty().def_eq(&Type::unit()).unwrap());
    assert!(q.source().def_eq(&Term::star()).unwrap());
  }

  #[test]
  fn test_ap_rejects_foreign_path() {
    let p = refl(&Type::unit(), &Term::star()).unwrap();
    assert!(ap(&negate(), &p).is_err());
  }

  #[quickcheck]
  fn prop_sym_involution(p: ArbPath) -> bool {
    let p = p.0;
    let a = p.ty().clone();
    let s = sym(&a, p.source(), p.target(), &p).unwrap();
    let ss = sym(&a, s.source(), s.target(), &s).unwrap();
    ss.def_eq(&p).unwrap()
  }

  #[quickcheck]
  fn prop_trans_units(p: ArbPath) -> bool {
    let p = p.0;
    let a = p.ty().clone();
    let (x, y) = (p.source(), p.target());
    let rx = refl(&a, x).unwrap();
    let ry = refl(&a, y).unwrap();
    let right = trans(&a, x, y, y, &p, &ry).unwrap();
    let left = trans(&a, x, x, y, &rx, &p).unwrap();
    right.def_eq(&p).unwrap() && left.def_eq(&p).unwrap()
  }

  #[quickcheck]
  fn prop_ap_identity(p: ArbPath) -> bool {
    let p = p.0;
    let q = ap(&id_function(p.ty()), &p).unwrap();
    q.def_eq(&p).unwrap()
  }

  #[quickcheck]
  fn prop_ap_functorial(p: ArbPath) -> bool {
    let p = p.0;
    let f = negate();
    let g = to_unit();
    let nested = ap(&g, &ap(&f, &p).unwrap()).unwrap();
    let direct = ap(&compose_functions(&f, &g).unwrap(), &p).unwrap();
    nested.def_eq(&direct).unwrap()
  }

  #[quickcheck]
  fn prop_j_computation_rule(p: ArbPath) -> bool {
    // every closed derived path eliminates exactly like the refl it came from
    let p = p.0;
    let a = p.ty().clone();
    let out = j(
      &a,
      |u, v, _| Ok(Type::identity(a.clone(), u.clone(), v.clone())),
      |z| Ok(Term::path(refl(&a, z)?)),
      p.source(),
      p.target(),
      &p,
    )
    .unwrap();
    let leaf = refl(&a, p.source()).unwrap();
    out.as_path().is_some_and(|r| r.def_eq(&leaf).unwrap())
  }
}
