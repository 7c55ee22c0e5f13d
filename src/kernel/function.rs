//! Typed functions and their algebra.
//!
//! A [`Function`] on an enumerable domain is stored as an explicit table so
//! round-trip checks can walk it; on any other domain it keeps an opaque
//! closure. Two functions are equal when their domains and codomains are:
//! the mapping is never compared (see `def_eq`).

use std::fmt;
use std::sync::Arc;

use super::error::{KernelError, KernelResult};
use super::expr::{Family, Term, Type};

type MapFn = dyn Fn(&Term) -> KernelResult<Term> + Send + Sync;

/// A total mapping the kernel cannot look inside.
#[derive(Clone)]
pub struct OpaqueFn(Arc<MapFn>);

impl OpaqueFn {
  pub fn new<F>(f: F) -> Self
  where
    F: Fn(&Term) -> KernelResult<Term> + Send + Sync + 'static,
  {
    OpaqueFn(Arc::new(f))
  }

  fn call(&self, x: &Term) -> KernelResult<Term> {
    (self.0)(x)
  }
}

impl fmt::Debug for OpaqueFn {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "<opaque>")
  }
}

#[derive(Debug, Clone)]
pub enum Mapping {
  Identity,
  /// One `(input, output)` entry per inhabitant of the domain.
  Table(Arc<[(Term, Term)]>),
  /// Apply the first function, then the second.
  Compose(Arc<(Function, Function)>),
  Opaque(OpaqueFn),
}

#[derive(Debug, Clone)]
pub struct Function {
  domain: Type,
  codomain: Type,
  mapping: Mapping,
}

impl Function {
  pub fn identity(a: &Type) -> Self {
    Function {
      domain: a.clone(),
      codomain: a.clone(),
      mapping: Mapping::Identity,
    }
  }

  /// Builds a function from an explicit table. The domain must be
  /// enumerable, every inhabitant must appear exactly once, and every output
  /// must inhabit the codomain.
  pub fn table(
    domain: Type,
    codomain: Type,
    entries: Vec<(Term, Term)>,
  ) -> KernelResult<Self> {
    for (x, y) in &entries {
      domain.check(x)?;
      codomain.check(y)?;
    }
    for elem in domain.inhabitants()? {
      let mut hits = 0;
      for (x, _) in &entries {
        if x.def_eq(&elem)? {
          hits += 1;
        }
      }
      if hits != 1 {
        return Err(KernelError::NonTotalMapping { domain, missing: elem });
      }
    }
    Ok(Function { domain, codomain, mapping: Mapping::Table(entries.into()) })
  }

  /// Tabulates `f` when the domain is enumerable and keeps it opaque
  /// otherwise.
  pub fn from_fn<F>(domain: Type, codomain: Type, f: F) -> KernelResult<Self>
  where
    F: Fn(&Term) -> KernelResult<Term> + Send + Sync + 'static,
  {
    if domain.is_enumerable() {
      let entries = domain
        .inhabitants()?
        .into_iter()
        .map(|x| {
          let y = f(&x)?;
          Ok((x, y))
        })
        .collect::<KernelResult<Vec<_>>>()?;
      Function::table(domain, codomain, entries)
    } else {
      Ok(Function::opaque(domain, codomain, f))
    }
  }

  pub fn opaque<F>(domain: Type, codomain: Type, f: F) -> Self
  where
    F: Fn(&Term) -> KernelResult<Term> + Send + Sync + 'static,
  {
    Function { domain, codomain, mapping: Mapping::Opaque(OpaqueFn::new(f)) }
  }

  pub fn constant(
    domain: Type,
    codomain: Type,
    value: Term,
  ) -> KernelResult<Self> {
    codomain.check(&value)?;
    Function::from_fn(domain, codomain, move |_| Ok(value.clone()))
  }

  pub fn domain(&self) -> &Type {
    &self.domain
  }
  pub fn codomain(&self) -> &Type {
    &self.codomain
  }
  pub fn mapping(&self) -> &Mapping {
    &self.mapping
  }

  /// Applies the function to `x : domain`.
  pub fn apply(&self, x: &Term) -> KernelResult<Term> {
    self.domain.check(x)?;
    match &self.mapping {
      Mapping::Identity => Ok(x.clone()),
      Mapping::Table(entries) => {
        for (input, output) in entries.iter() {
          if input.def_eq(x)? {
            return Ok(output.clone());
          }
        }
        Err(KernelError::NonTotalMapping {
          domain: self.domain.clone(),
          missing: x.clone(),
        })
      },
      Mapping::Compose(pair) => {
        let (first, second) = pair.as_ref();
        second.apply(&first.apply(x)?)
      },
      Mapping::Opaque(f) => {
        let y = f.call(x)?;
        self.codomain.check(&y)?;
        Ok(y)
      },
    }
  }
}

/// The identity function on `a`.
pub fn id_function(a: &Type) -> Function {
  Function::identity(a)
}

/// `g ∘ f`: first `f`, then `g`. Requires `f.codomain ≡ g.domain`.
pub fn compose_functions(f: &Function, g: &Function) -> KernelResult<Function> {
  if !f.codomain.def_eq(&g.domain)? {
    return Err(KernelError::NotComposable {
      codomain: f.codomain.clone(),
      domain: g.domain.clone(),
    });
  }
  Ok(Function {
    domain: f.domain.clone(),
    codomain: g.codomain.clone(),
    mapping: Mapping::Compose(Arc::new((f.clone(), g.clone()))),
  })
}

// ============================================================================
// Dependent functions
// ============================================================================

/// An inhabitant of `Π (x : A), B x`.
#[derive(Debug, Clone)]
pub struct DependentFunction {
  domain: Type,
  family: Family,
  pi: Type,
  mapping: OpaqueFn,
}

impl DependentFunction {
  pub fn new<F>(domain: Type, family: Family, f: F) -> Self
  where
    F: Fn(&Term) -> KernelResult<Term> + Send + Sync + 'static,
  {
    let pi = Type::pi(domain.clone(), family.clone());
    DependentFunction { domain, family, pi, mapping: OpaqueFn::new(f) }
  }

  pub fn domain(&self) -> &Type {
    &self.domain
  }
  pub fn pi_type(&self) -> &Type {
    &self.pi
  }

  /// Applies the function, checking the result against the fibre over `x`.
  pub fn apply(&self, x: &Term) -> KernelResult<Term> {
    self.domain.check(x)?;
    let y = self.mapping.call(x)?;
    self.family.at(x).check(&y)?;
    Ok(y)
  }
}

pub fn dependent_apply(f: &DependentFunction, x: &Term) -> KernelResult<Term> {
  f.apply(x)
}
