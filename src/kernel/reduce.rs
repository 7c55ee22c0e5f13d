//! Reduction of path derivations.
//!
//! A derivation is rewritten with the computation rules of the derived
//! operations: `sym refl = refl`, `trans p refl = p`, `ap f refl = refl`.
//! `sym` and `ap` eliminate their argument and `trans` its second one, so
//! those positions always reduce to `refl` and the normal form of any path
//! is either `refl` or the univalence postulate itself.

use std::sync::Arc;

use super::error::{KernelError, KernelResult};
use super::expr::Term;
use super::path::{Path, Proof};

/// Normalizes the derivation of `p`. The result has the same carrier and
/// endpoints as `p` (up to definitional equality).
pub fn normalize(p: &Path) -> KernelResult<Path> {
  let rebuild = |proof| {
    Path::derived(p.ty().clone(), p.source().clone(), p.target().clone(), proof)
  };
  match p.proof() {
    Proof::Refl | Proof::Univalence(_) => Ok(p.clone()),
    Proof::Sym(q) | Proof::Ap(_, q) => {
      let q = normalize(q)?;
      if q.is_refl() {
        return Ok(rebuild(Proof::Refl));
      }
      Err(KernelError::NonReflexivePath { path: Box::new(q) })
    },
    Proof::Trans(l, r) => {
      let r = normalize(r)?;
      if r.is_refl() {
        return normalize(l);
      }
      Err(KernelError::NonReflexivePath { path: Box::new(r) })
    },
  }
}

/// Finds the `a` such that `p` was derived from `refl(A, a)`.
///
/// Fails with [`KernelError::NonReflexivePath`] when the derivation does not
/// bottom out at `refl`, i.e. when it uses the univalence postulate.
pub fn refl_leaf(p: &Path) -> KernelResult<Term> {
  let n = normalize(p)?;
  if n.is_refl() && n.source().def_eq(n.target())? {
    Ok(n.source().clone())
  } else {
    Err(KernelError::NonReflexivePath { path: Box::new(p.clone()) })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::kernel::equiv::prove_equivalence;
  use crate::kernel::expr::Type;
  use crate::kernel::function::{Function, id_function};
  use crate::kernel::path::{ap, refl, sym, trans};

  fn ua_unit_bool() -> Path {
    let f = Function::constant(Type::unit(), Type::bool(), Term::tt()).unwrap();
    let g =
      Function::constant(Type::bool(), Type::unit(), Term::star()).unwrap();
    prove_equivalence(&Type::unit(), &Type::bool(), &f, &g)
      .unwrap()
      .to_path()
  }

  #[test]
  fn test_closed_derivations_reduce_to_refl() {
    let bool_ty = Type::bool();
    let p = refl(&bool_ty, &Term::tt()).unwrap();
    let s = sym(&bool_ty, &Term::tt(), &Term::tt(), &p).unwrap();
    let t = trans(&bool_ty, &Term::tt(), &Term::tt(), &Term::tt(), &s, &p)
      .unwrap();
    let a = ap(&id_function(&bool_ty), &t).unwrap();
    assert!(normalize(&a).unwrap().is_refl());
    assert_eq!(refl_leaf(&a).unwrap().as_bool(), Some(true));
  }

  #[test]
  fn test_univalence_is_stuck() {
    let ua = ua_unit_bool();
    assert!(!normalize(&ua).unwrap().is_refl());
    let err = refl_leaf(&ua).unwrap_err();
    assert!(matches!(err, KernelError::NonReflexivePath { .. }));
  }

  #[test]
  fn test_trans_with_refl_drops_refl_around_postulate() {
    let ua = ua_unit_bool();
    let u = Type::universe();
    let right = refl(&u, ua.target()).unwrap();
    let t =
      trans(&u, ua.source(), ua.target(), ua.target(), &ua, &right).unwrap();
    assert!(matches!(t.proof(), Proof::Trans(..)));
    let n = normalize(&t).unwrap();
    assert!(matches!(n.proof(), Proof::Univalence(_)));
    assert!(t.is_postulated());
  }
}
