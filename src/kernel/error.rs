use super::expr::{Term, Type};
use super::path::Path;

pub type KernelResult<T> = Result<T, KernelError>;

/// Coarse classification of kernel failures. Every [`KernelError`] falls in
/// exactly one of these buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  TypeMismatch,
  UnsupportedShape,
  QuasiInverseViolation,
  EliminatorPrecondition,
}

/// Which round trip of a quasi-inverse pair broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundTrip {
  /// `g(f(x)) = x` on the domain of `f`.
  Eta,
  /// `f(g(y)) = y` on the domain of `g`.
  Epsilon,
}

#[derive(Debug, Clone)]
pub enum KernelError {
  TypeMismatch {
    expected: Type,
    found: Type,
  },
  NotComposable {
    codomain: Type,
    domain: Type,
  },
  DomainNotEnumerable {
    domain: Type,
  },
  NonTotalMapping {
    domain: Type,
    missing: Term,
  },
  UnsupportedShape {
    domain: Type,
    codomain: Type,
  },
  QuasiInverseViolation {
    direction: RoundTrip,
    witness: Term,
    image: Term,
  },
  IllTypedMotive {
    expected: Type,
    found: Type,
  },
  EndpointMismatch {
    expected: Term,
    found: Term,
  },
  NonReflexivePath {
    path: Box<Path>,
  },
}

impl KernelError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      KernelError::TypeMismatch { .. } | KernelError::NotComposable { .. } => {
        ErrorKind::TypeMismatch
      },
      KernelError::DomainNotEnumerable { .. }
      | KernelError::NonTotalMapping { .. }
      | KernelError::UnsupportedShape { .. } => ErrorKind::UnsupportedShape,
      KernelError::QuasiInverseViolation { .. } => {
        ErrorKind::QuasiInverseViolation
      },
      KernelError::IllTypedMotive { .. }
      | KernelError::EndpointMismatch { .. }
      | KernelError::NonReflexivePath { .. } => {
        ErrorKind::EliminatorPrecondition
      },
    }
  }
}

impl std::fmt::Display for KernelError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      KernelError::TypeMismatch { expected, found } => {
        write!(f, "type mismatch: expected {expected}, found {found}")
      },
      KernelError::NotComposable { codomain, domain } => {
        write!(f, "not composable: codomain {codomain} vs domain {domain}")
      },
      KernelError::DomainNotEnumerable { domain } => {
        write!(f, "domain not enumerable: {domain}")
      },
      KernelError::NonTotalMapping { domain, missing } => {
        write!(f, "mapping on {domain} has no unique image for {missing}")
      },
      KernelError::UnsupportedShape { domain, codomain } => write!(
        f,
        "quasi-inverse check unsupported for these types: {domain} -> {codomain}"
      ),
      KernelError::QuasiInverseViolation { direction, witness, image } => {
        let law = match direction {
          RoundTrip::Eta => "g(f(x)) = x",
          RoundTrip::Epsilon => "f(g(y)) = y",
        };
        write!(
          f,
          "functions are not quasi-inverses: {law} fails at {witness} (got {image})"
        )
      },
      KernelError::IllTypedMotive { expected, found } => {
        write!(f, "ill-typed motive: expected {expected}, found {found}")
      },
      KernelError::EndpointMismatch { expected, found } => {
        write!(f, "path endpoint mismatch: expected {expected}, found {found}")
      },
      KernelError::NonReflexivePath { path } => {
        write!(f, "non-reflexivity path: {path}")
      },
    }
  }
}

impl std::error::Error for KernelError {}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_kind_buckets() {
    let e = KernelError::NotComposable {
      codomain: Type::unit(),
      domain: Type::bool(),
    };
    assert_eq!(e.kind(), ErrorKind::TypeMismatch);
    let e = KernelError::DomainNotEnumerable { domain: Type::universe() };
    assert_eq!(e.kind(), ErrorKind::UnsupportedShape);
    let e = KernelError::EndpointMismatch {
      expected: Term::tt(),
      found: Term::ff(),
    };
    assert_eq!(e.kind(), ErrorKind::EliminatorPrecondition);
  }

  #[test]
  fn test_display_names_the_law() {
    let e = KernelError::QuasiInverseViolation {
      direction: RoundTrip::Eta,
      witness: Term::ff(),
      image: Term::tt(),
    };
    let msg = e.to_string();
    assert!(msg.starts_with("functions are not quasi-inverses"));
    assert!(msg.contains("g(f(x)) = x"));
    assert!(msg.contains("false"));
  }
}
