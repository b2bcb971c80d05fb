mod common;

mod errors {
    use otter_smt::{
        procedures::apply_consequences::PropagationOk,
        types::err::{AtomDBError, ErrorKind, StateError, TheoryError},
    };

    use crate::common::{checked_context, register, Journal, RecordingTheory};

    #[test]
    fn unfalsified_conflict() {
        let mut the_context = checked_context();
        let journal = Journal::default();

        let a = the_context.fresh_or_max_literal();
        let b = the_context.fresh_or_max_literal();

        // b has no value when the conflict is given.
        let theory = RecordingTheory::new(0, &journal).conflict_on(a, vec![-a, b]);
        let index = register(&mut the_context, Box::new(theory), &[a as u32]);

        assert!(the_context.decide_literal(a).is_ok());
        assert_eq!(
            the_context.propagate(),
            Err(ErrorKind::Theory(TheoryError::UnfalsifiedConflict(index)))
        );
    }

    #[test]
    fn malformed_reason() {
        let mut the_context = checked_context();
        let journal = Journal::default();

        let a = the_context.fresh_or_max_literal();
        let b = the_context.fresh_or_max_literal();

        let theory = RecordingTheory::new(0, &journal)
            .implies(vec![a], b)
            .forbids(vec![-a, -b])
            .with_malformed_reasons();
        let index = register(&mut the_context, Box::new(theory), &[a as u32, b as u32]);

        assert!(the_context.decide_literal(a).is_ok());
        let origin = match the_context.propagate() {
            Ok(PropagationOk::Conflict(origin)) => origin,
            other => panic!("expected a conflict, found {other:?}"),
        };

        assert_eq!(
            the_context.recover(origin),
            Err(ErrorKind::Theory(TheoryError::MalformedReason(index)))
        );
    }

    #[test]
    fn reason_with_later_literal() {
        let mut the_context = checked_context();
        let journal = Journal::default();

        let literals = the_context.fresh_or_max_literals(4);
        let (a, b, e, x) = (literals[0], literals[1], literals[2], literals[3]);

        assert!(the_context.add_clause(vec![-a, e]).is_ok());
        assert!(the_context.add_clause(vec![-b, x]).is_ok());
        assert!(the_context.add_clause(vec![-e, -b, -x]).is_ok());

        // x is false in the reason, though valued after b at the same level.
        let theory = RecordingTheory::new(0, &journal)
            .implies(vec![a], b)
            .explains(b, vec![b, -a, -x]);
        let index = register(&mut the_context, Box::new(theory), &[a as u32, b as u32]);

        assert!(the_context.decide_literal(a).is_ok());
        let origin = match the_context.propagate() {
            Ok(PropagationOk::Conflict(origin)) => origin,
            other => panic!("expected a conflict, found {other:?}"),
        };

        assert_eq!(
            the_context.recover(origin),
            Err(ErrorKind::Theory(TheoryError::MalformedReason(index)))
        );
    }

    #[test]
    fn failed_propagation_check() {
        let mut the_context = checked_context();
        let journal = Journal::default();

        let a = the_context.fresh_or_max_literal();
        let theory = RecordingTheory::new(0, &journal).failing_propagated_check();
        let index = register(&mut the_context, Box::new(theory), &[a as u32]);

        assert_eq!(
            the_context.solve(),
            Err(ErrorKind::Theory(TheoryError::CheckPropagated(index)))
        );
    }

    #[test]
    fn failed_solve_check() {
        let mut the_context = checked_context();
        let journal = Journal::default();

        let a = the_context.fresh_or_max_literal();
        let theory = RecordingTheory::new(0, &journal).failing_solved_check();
        let index = register(&mut the_context, Box::new(theory), &[a as u32]);

        assert_eq!(
            the_context.solve(),
            Err(ErrorKind::Theory(TheoryError::CheckSolved(index)))
        );
    }

    #[test]
    fn checks_skipped_when_unset() {
        let mut the_context = checked_context();
        the_context.config.check_theories.value = false;
        let journal = Journal::default();

        let a = the_context.fresh_or_max_literal();
        let theory = RecordingTheory::new(0, &journal)
            .failing_propagated_check()
            .failing_solved_check();
        register(&mut the_context, Box::new(theory), &[a as u32]);

        assert!(the_context.solve().is_ok());
    }

    #[test]
    fn index_already_set() {
        let mut the_context = checked_context();
        let journal = Journal::default();

        let theory = RecordingTheory::new(0, &journal).with_index(7);
        assert_eq!(
            the_context.add_theory(Box::new(theory)),
            Err(ErrorKind::Theory(TheoryError::IndexAlreadySet(7)))
        );
        assert_eq!(the_context.theory_db.count(), 0);
    }

    #[test]
    fn index_not_kept() {
        let mut the_context = checked_context();
        let journal = Journal::default();

        let theory = RecordingTheory::new(0, &journal).forgetful();
        assert_eq!(
            the_context.add_theory(Box::new(theory)),
            Err(ErrorKind::Theory(TheoryError::IndexNotKept(0)))
        );
    }

    #[test]
    fn registration_after_decision() {
        let mut the_context = checked_context();
        let journal = Journal::default();

        let a = the_context.fresh_or_max_literal();
        let index = register(
            &mut the_context,
            Box::new(RecordingTheory::new(0, &journal)),
            &[],
        );
        assert!(the_context.decide_literal(a).is_ok());

        assert_eq!(
            the_context.add_theory(Box::new(RecordingTheory::new(1, &journal))),
            Err(ErrorKind::Theory(TheoryError::RegistrationAfterDecision))
        );
        assert_eq!(
            the_context.observe(index, a as u32),
            Err(ErrorKind::State(StateError::SolveInProgress))
        );

        the_context.clear_decisions();
        assert!(the_context
            .add_theory(Box::new(RecordingTheory::new(1, &journal)))
            .is_ok());
        assert!(the_context.observe(index, a as u32).is_ok());
    }

    #[test]
    fn unknown_theory_and_atom() {
        let mut the_context = checked_context();
        let journal = Journal::default();

        let a = the_context.fresh_or_max_literal();
        let index = register(
            &mut the_context,
            Box::new(RecordingTheory::new(0, &journal)),
            &[],
        );

        assert_eq!(
            the_context.observe(index + 1, a as u32),
            Err(ErrorKind::Theory(TheoryError::UnknownTheory(index + 1)))
        );
        assert_eq!(
            the_context.observe(index, 99),
            Err(ErrorKind::AtomDB(AtomDBError::UnknownAtom))
        );
        assert_eq!(
            the_context.set_priority(index + 1, 0),
            Err(ErrorKind::Theory(TheoryError::UnknownTheory(index + 1)))
        );
        assert_eq!(
            the_context.activity(index + 1),
            Err(ErrorKind::Theory(TheoryError::UnknownTheory(index + 1)))
        );
    }

    #[test]
    fn decision_on_valued_atom() {
        let mut the_context = checked_context();

        let a = the_context.fresh_or_max_literal();
        assert!(the_context.add_clause(vec![a]).is_ok());

        assert_eq!(
            the_context.decide_literal(-a),
            Err(ErrorKind::ValuationConflict)
        );
        assert_eq!(
            the_context.decide_literal(42),
            Err(ErrorKind::AtomDB(AtomDBError::UnknownAtom))
        );
    }

    #[test]
    fn clause_after_decision() {
        let mut the_context = checked_context();

        let literals = the_context.fresh_or_max_literals(2);
        assert!(the_context.decide_literal(literals[0]).is_ok());
        assert!(matches!(
            the_context.add_clause(vec![literals[1]]),
            Err(ErrorKind::ClauseDB(_))
        ));
    }
}
