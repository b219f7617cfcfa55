#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};

use forge_types::{Initializer, Type, Value};

use crate::{ActivationError, Activator, ActivatorConfig, CallSignature, DynamicCode};

fn activator() -> Activator {
	Activator::new(ActivatorConfig::new(DynamicCode::Enabled))
}

fn pair(runs: Arc<AtomicUsize>) -> Type {
	Type::reference_type("Pair")
		.field("name", &Type::string())
		.field("n", &Type::int())
		.initializer(Initializer::public(&[&Type::string(), &Type::int()], move |fields, args| {
			runs.fetch_add(1, Ordering::SeqCst);
			fields.set("name", args[0].clone())?;
			fields.set("n", args[1].clone())
		}))
		.build()
		.expect("Pair builds")
}

fn defaulted(runs: Arc<AtomicUsize>) -> Type {
	Type::reference_type("Defaulted")
		.field("n", &Type::int())
		.initializer(Initializer::public(&[], move |fields, _| {
			runs.fetch_add(1, Ordering::SeqCst);
			fields.set("n", Value::Int(1))
		}))
		.build()
		.expect("Defaulted builds")
}

fn hidden() -> Type {
	Type::reference_type("Hidden")
		.field("n", &Type::int())
		.initializer(Initializer::non_public(&[&Type::int()], |fields, args| fields.set("n", args[0].clone())))
		.build()
		.expect("Hidden builds")
}

/// Invariant: a published entry is reused, never re-synthesized or replaced.
pub(crate) fn inv_idempotent_publication() {
	let act = activator();
	let ty = pair(Arc::new(AtomicUsize::new(0)));
	let sig = CallSignature::new([&Type::string(), &Type::int()], &ty);

	let first = act.activator(&ty, &sig, false).unwrap();
	let second = act.activator(&ty, &sig, false).unwrap();
	assert!(first.same_body(&second), "second request must return the published factory");

	let args = [Value::from("x"), Value::Int(1)];
	let a = first.invoke(&args).unwrap();
	let b = second.invoke(&args).unwrap();
	assert_eq!(a.field("name"), b.field("name"));
	assert_eq!(a.field("n"), b.field("n"));
	assert_ne!(a, b, "each invocation constructs a distinct reference instance");

	let stats = act.stats();
	assert_eq!(stats.syntheses, 1);
	assert_eq!(stats.misses, 1);
	assert_eq!(stats.hits, 1);
	assert_eq!(act.cached_activators(), 1);
}

#[cfg_attr(test, test)]
pub(crate) fn test_idempotent_publication() {
	inv_idempotent_publication()
}

/// Invariant: visibility outcomes depend only on the request, not on what is cached.
pub(crate) fn inv_visibility_independent_of_call_order() {
	let denied = |r: &Result<_, ActivationError>| matches!(r, Err(ActivationError::NonPublicInitializerDenied { .. }));

	// Restrictive first (miss), then permissive (hit), then restrictive (hit).
	let act = activator();
	let ty = hidden();
	let sig = CallSignature::new([&Type::int()], &ty);
	assert!(denied(&act.activator(&ty, &sig, false)));
	assert!(act.activator(&ty, &sig, true).is_ok());
	assert!(denied(&act.activator(&ty, &sig, false)));

	// Permissive first (miss), then restrictive (hit).
	let act = activator();
	let ty = hidden();
	let sig = CallSignature::new([&Type::int()], &ty);
	let factory = act.activator(&ty, &sig, true).unwrap();
	assert_eq!(factory.invoke(&[Value::Int(5)]).unwrap().field("n"), Some(Value::Int(5)));
	assert!(denied(&act.activator(&ty, &sig, false)));
	assert_eq!(act.stats().syntheses, 1, "denial must not trigger re-synthesis");
}

#[cfg_attr(test, test)]
pub(crate) fn test_visibility_independent_of_call_order() {
	inv_visibility_independent_of_call_order()
}

/// Invariant: failed requests leave no cache entry behind.
pub(crate) fn inv_failures_not_published() {
	let act = activator();
	let ty = pair(Arc::new(AtomicUsize::new(0)));

	let no_match = CallSignature::new([&Type::int()], &ty);
	for _ in 0..2 {
		assert!(matches!(
			act.activator(&ty, &no_match, true),
			Err(ActivationError::NoMatchingInitializer { .. })
		));
	}

	let unrelated = Type::reference_type("Unrelated").build().unwrap();
	let wrong_result = CallSignature::new([&Type::string(), &Type::int()], &unrelated);
	assert!(matches!(
		act.activator(&ty, &wrong_result, true),
		Err(ActivationError::IncompatibleResultType { .. })
	));

	let no_default = Type::reference_type("NoDefault").build().unwrap();
	for _ in 0..2 {
		assert!(matches!(
			act.default_activator(&no_default, true),
			Err(ActivationError::NoDefaultInitializer { .. })
		));
	}

	assert_eq!(act.cached_activators(), 0);
	assert_eq!(act.cached_default_activators(), 0);
	let stats = act.stats();
	assert_eq!(stats.syntheses, 0);
	assert_eq!(stats.misses, 3, "every failed request is a fresh miss");
}

#[cfg_attr(test, test)]
pub(crate) fn test_failures_not_published() {
	inv_failures_not_published()
}

/// Invariant: concurrent first access synthesizes a bounded number of times and publishes one
/// entry; later requests never synthesize.
pub(crate) fn inv_concurrent_first_access() {
	const THREADS: usize = 16;

	let act = activator();
	let runs = Arc::new(AtomicUsize::new(0));
	let ty = pair(Arc::clone(&runs));
	let sig = CallSignature::new([&Type::string(), &Type::int()], &ty);
	let barrier = Barrier::new(THREADS);

	let factories: Vec<_> = std::thread::scope(|s| {
		let handles: Vec<_> = (0..THREADS)
			.map(|i| {
				let (act, ty, sig, barrier) = (&act, &ty, &sig, &barrier);
				s.spawn(move || {
					barrier.wait();
					let factory = act.activator(ty, sig, false).unwrap();
					let value = factory.invoke(&[Value::from("t"), Value::Int(i as i64)]).unwrap();
					assert_eq!(value.field("n"), Some(Value::Int(i as i64)));
					factory
				})
			})
			.collect();
		handles.into_iter().map(|h| h.join().unwrap()).collect()
	});

	let stats = act.stats();
	assert!(stats.syntheses >= 1 && stats.syntheses <= THREADS as u64);
	assert_eq!(stats.syntheses - stats.races_lost, 1, "exactly one synthesis is published");
	assert_eq!(act.cached_activators(), 1);
	assert_eq!(runs.load(Ordering::SeqCst), THREADS);

	let published = act.activator(&ty, &sig, false).unwrap();
	assert!(factories.iter().all(|f| f.same_body(&published)), "all callers observe the published factory");

	for _ in 0..100 {
		act.activator(&ty, &sig, false).unwrap();
	}
	assert_eq!(act.stats().syntheses, stats.syntheses, "hits never synthesize");
}

#[cfg_attr(test, test)]
pub(crate) fn test_concurrent_first_access() {
	inv_concurrent_first_access()
}

/// Invariant: concurrent first access to a type's default activator selects and publishes one
/// activator; every caller receives that same instance.
pub(crate) fn inv_concurrent_default_first_access() {
	const THREADS: usize = 16;

	let act = activator();
	let runs = Arc::new(AtomicUsize::new(0));
	let ty = defaulted(Arc::clone(&runs));
	let barrier = Barrier::new(THREADS);

	let activators: Vec<_> = std::thread::scope(|s| {
		let handles: Vec<_> = (0..THREADS)
			.map(|_| {
				let (act, ty, barrier) = (&act, &ty, &barrier);
				s.spawn(move || {
					barrier.wait();
					let activator = act.default_activator(ty, false).unwrap();
					assert_eq!(activator.create().unwrap().field("n"), Some(Value::Int(1)));
					activator
				})
			})
			.collect();
		handles.into_iter().map(|h| h.join().unwrap()).collect()
	});

	let published = act.default_activator(&ty, false).unwrap();
	assert!(
		activators.iter().all(|a| Arc::ptr_eq(a, &published)),
		"all callers observe the published default activator"
	);
	assert_eq!(act.cached_default_activators(), 1);

	let stats = act.stats();
	assert_eq!(stats.default_selections, 1);
	assert_eq!(stats.syntheses - stats.races_lost, 1, "exactly one synthesis is published");
	assert_eq!(runs.load(Ordering::SeqCst), THREADS);

	for _ in 0..100 {
		act.default_activator(&ty, false).unwrap();
	}
	assert_eq!(act.stats().syntheses, stats.syntheses, "hits never synthesize");
}

#[cfg_attr(test, test)]
pub(crate) fn test_concurrent_default_first_access() {
	inv_concurrent_default_first_access()
}
