//! Demo driver: builds the base types, tries a few candidate equivalences and
//! reports each outcome. Set `RUST_LOG` to adjust verbosity.

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use ht_rs::kernel::{
  Candidate, Function, Term, Type, Verdict, compose_functions, verify_all,
};
use ht_rs::space::Space;

fn main() -> anyhow::Result<()> {
  tracing_subscriber::registry()
    .with(fmt::layer())
    .with(
      EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info")),
    )
    .init();

  let mut space = Space::new();
  space.register("Unit", Type::unit());
  space.register("Bool", Type::bool());
  let unit = space.lookup("Unit").context("Unit not registered")?.clone();
  let bool_ty = space.lookup("Bool").context("Bool not registered")?.clone();

  let f = Function::constant(unit.clone(), bool_ty.clone(), Term::tt())?;
  let g = Function::constant(bool_ty.clone(), unit.clone(), Term::star())?;
  let not = Function::from_fn(bool_ty.clone(), bool_ty.clone(), |x| {
    Ok(Term::bool(!x.as_bool().unwrap_or_default()))
  })?;
  let always_true =
    Function::constant(bool_ty.clone(), bool_ty.clone(), Term::tt())?;
  let id_bool = Function::identity(&bool_ty);

  let gf = compose_functions(&f, &g)?;
  let round_trip = gf.apply(&Term::star())?;
  info!(result = %round_trip, "g ∘ f applied to star");

  let candidates = [
    ("Unit ≃ Bool", Candidate::new(unit.clone(), bool_ty.clone(), f, g)),
    (
      "negation",
      Candidate::new(bool_ty.clone(), bool_ty.clone(), not.clone(), not),
    ),
    (
      "constant true",
      Candidate::new(
        bool_ty.clone(),
        bool_ty.clone(),
        always_true.clone(),
        always_true,
      ),
    ),
    (
      "identity on Bool",
      Candidate::new(bool_ty.clone(), bool_ty, id_bool.clone(), id_bool),
    ),
  ];
  let requests: Vec<_> = candidates.iter().map(|(_, c)| c.clone()).collect();

  for ((label, _), verdict) in candidates.iter().zip(verify_all(&requests)) {
    match verdict {
      Verdict::Verified(e) => {
        let path = e.to_path();
        info!(
          %label,
          %path,
          source = %path.source(),
          target = %path.target(),
          "proved equivalence"
        );
      },
      Verdict::Rejected(err) => {
        let kind = err.kind();
        error!(%label, ?kind, "failed to prove equivalence: {err}");
      },
    }
  }
  Ok(())
}
