mod common;

mod cardinality {
    use otter_smt::{context::Context, reports::Report, theories::cardinality::AtMost};

    use crate::common::{checked_context, register};

    /// Pigeons in holes, with a clause for each pigeon and a theory for each hole.
    fn pigeons(context: &mut Context, pigeons: usize, holes: usize) -> Vec<Vec<i32>> {
        let placements = (0..pigeons)
            .map(|_| context.fresh_or_max_literals(holes))
            .collect::<Vec<_>>();

        for pigeon in &placements {
            assert!(context.add_clause(pigeon.clone()).is_ok());
        }

        for hole in 0..holes {
            let members = placements
                .iter()
                .map(|pigeon| pigeon[hole])
                .collect::<Vec<_>>();
            let at_most = AtMost::new(members, 1);
            let atoms = at_most.atoms().collect::<Vec<_>>();
            register(context, Box::new(at_most), &atoms);
        }

        placements
    }

    #[test]
    fn pigeons_fit() {
        let mut the_context = checked_context();
        let placements = pigeons(&mut the_context, 4, 4);

        assert_eq!(the_context.solve(), Ok(Report::Satisfiable));

        for hole in 0..4 {
            let occupants = placements
                .iter()
                .filter(|pigeon| the_context.value_of(pigeon[hole]) == Some(true))
                .count();
            assert!(occupants <= 1);
        }
        for pigeon in &placements {
            assert!(pigeon
                .iter()
                .any(|placement| the_context.value_of(*placement) == Some(true)));
        }
    }

    #[test]
    fn pigeons_overflow() {
        let mut the_context = checked_context();
        pigeons(&mut the_context, 5, 4);

        assert_eq!(the_context.solve(), Ok(Report::Unsatisfiable));
        assert!(the_context.counters.theory_conflicts > 0);
        assert!(the_context.counters.reasons_built > 0);
    }

    #[test]
    fn satisfied_at_base() {
        let mut the_context = checked_context();
        let literals = the_context.fresh_or_max_literals(3);

        let at_most = AtMost::new(literals.clone(), 1);
        let atoms = at_most.atoms().collect::<Vec<_>>();
        register(&mut the_context, Box::new(at_most), &atoms);

        assert!(the_context.add_clause(vec![-literals[0]]).is_ok());
        assert!(the_context.add_clause(vec![-literals[1]]).is_ok());
        assert_eq!(the_context.solve(), Ok(Report::Satisfiable));

        the_context.clear_decisions();
        assert!(the_context.add_clause(vec![literals[2]]).is_ok());
        assert_eq!(the_context.solve(), Ok(Report::Satisfiable));
    }

    #[test]
    fn complementary_members() {
        let mut the_context = checked_context();
        let p = the_context.fresh_or_max_literal();
        assert!(the_context.add_clause(vec![p]).is_ok());

        // The atom of p is observed once for each member.
        let at_most = AtMost::new(vec![p, -p], 1);
        let atoms = at_most.atoms().collect::<Vec<_>>();
        let index = register(&mut the_context, Box::new(at_most), &atoms);
        assert_eq!(the_context.solve(), Ok(Report::Satisfiable));

        the_context.clear_decisions();
        assert!(the_context.observe(index, p as u32).is_ok());
        assert_eq!(the_context.solve(), Ok(Report::Satisfiable));
    }

    #[test]
    fn zero_bound() {
        let mut the_context = checked_context();
        let literals = the_context.fresh_or_max_literals(3);

        let at_most = AtMost::new(literals.clone(), 0);
        let atoms = at_most.atoms().collect::<Vec<_>>();
        register(&mut the_context, Box::new(at_most), &atoms);

        assert_eq!(the_context.solve(), Ok(Report::Satisfiable));
        for literal in &literals {
            assert_eq!(the_context.value_of(*literal), Some(false));
        }

        the_context.clear_decisions();
        assert!(the_context.add_clause(literals.clone()).is_ok());
        assert_eq!(the_context.solve(), Ok(Report::Unsatisfiable));
    }

    #[test]
    fn negative_members() {
        let mut the_context = checked_context();
        let literals = the_context.fresh_or_max_literals(3);

        // At least two of the literals are true.
        let negated = literals.iter().map(|l| -l).collect::<Vec<_>>();
        let at_most = AtMost::new(negated, 1);
        let atoms = at_most.atoms().collect::<Vec<_>>();
        register(&mut the_context, Box::new(at_most), &atoms);

        assert!(the_context.add_clause(vec![-literals[0]]).is_ok());
        assert_eq!(the_context.solve(), Ok(Report::Satisfiable));
        assert_eq!(the_context.value_of(literals[1]), Some(true));
        assert_eq!(the_context.value_of(literals[2]), Some(true));
    }
}

mod reach {
    use otter_smt::{
        context::Context, reports::Report, structures::atom::Atom,
        theories::cardinality::AtMost, theories::reach::Reachability,
    };

    use crate::common::{checked_context, register};

    struct Diamond {
        reach: Atom,
        // 0 -a-> 1 -b-> 3, and 0 -c-> 2 -d-> 3
        edges: [Atom; 4],
    }

    fn diamond(context: &mut Context) -> Diamond {
        let reach = context.fresh_or_max_atom();
        let edges = [
            context.fresh_or_max_atom(),
            context.fresh_or_max_atom(),
            context.fresh_or_max_atom(),
            context.fresh_or_max_atom(),
        ];

        let mut reachability = Reachability::new(4, 0, 3, reach);
        reachability.add_edge(0, 1, edges[0]);
        reachability.add_edge(1, 3, edges[1]);
        reachability.add_edge(0, 2, edges[2]);
        reachability.add_edge(2, 3, edges[3]);

        let atoms = reachability.atoms().collect::<Vec<_>>();
        register(context, Box::new(reachability), &atoms);

        Diamond { reach, edges }
    }

    fn positive(atom: Atom) -> i32 {
        atom as i32
    }

    #[test]
    fn detour() {
        let mut the_context = checked_context();
        let graph = diamond(&mut the_context);

        assert!(the_context.add_clause(vec![positive(graph.reach)]).is_ok());
        assert!(the_context.add_clause(vec![-positive(graph.edges[0])]).is_ok());

        assert_eq!(the_context.solve(), Ok(Report::Satisfiable));
        assert_eq!(the_context.value_of_atom(graph.edges[2]), Some(true));
        assert_eq!(the_context.value_of_atom(graph.edges[3]), Some(true));
        assert!(the_context.counters.theory_decisions > 0);

        let mut witness = Vec::default();
        assert!(the_context.write_theory_witnesses(&mut witness).is_ok());
        assert_eq!(String::from_utf8(witness).unwrap(), "path 0 2 3\n");
    }

    #[test]
    fn cut() {
        let mut the_context = checked_context();
        let graph = diamond(&mut the_context);

        assert!(the_context.add_clause(vec![positive(graph.reach)]).is_ok());
        assert!(the_context.add_clause(vec![-positive(graph.edges[1])]).is_ok());
        assert!(the_context.add_clause(vec![-positive(graph.edges[2])]).is_ok());

        assert_eq!(the_context.solve(), Ok(Report::Unsatisfiable));
    }

    #[test]
    fn forced_path() {
        let mut the_context = checked_context();
        let graph = diamond(&mut the_context);

        assert!(the_context.add_clause(vec![-positive(graph.reach)]).is_ok());
        assert!(the_context.add_clause(vec![positive(graph.edges[0])]).is_ok());
        assert!(the_context.add_clause(vec![positive(graph.edges[1])]).is_ok());

        assert_eq!(the_context.solve(), Ok(Report::Unsatisfiable));
    }

    #[test]
    fn unreachable() {
        let mut the_context = checked_context();
        let graph = diamond(&mut the_context);

        assert!(the_context.add_clause(vec![-positive(graph.reach)]).is_ok());
        // Some edge of each route.
        assert!(the_context
            .add_clause(vec![positive(graph.edges[0]), positive(graph.edges[1])])
            .is_ok());
        assert!(the_context
            .add_clause(vec![positive(graph.edges[2]), positive(graph.edges[3])])
            .is_ok());

        assert_eq!(the_context.solve(), Ok(Report::Satisfiable));
        let a_b = the_context.value_of_atom(graph.edges[0]) == Some(true)
            && the_context.value_of_atom(graph.edges[1]) == Some(true);
        let c_d = the_context.value_of_atom(graph.edges[2]) == Some(true)
            && the_context.value_of_atom(graph.edges[3]) == Some(true);
        assert!(!a_b && !c_d);

        let mut witness = Vec::default();
        assert!(the_context.write_theory_witnesses(&mut witness).is_ok());
        assert_eq!(String::from_utf8(witness).unwrap(), "no path\n");
    }

    #[test]
    fn bounded_path() {
        for (bound, report) in [(1, Report::Unsatisfiable), (2, Report::Satisfiable)] {
            let mut the_context = checked_context();
            let graph = diamond(&mut the_context);
            assert!(the_context.add_clause(vec![positive(graph.reach)]).is_ok());

            let members = graph.edges.iter().map(|e| positive(*e)).collect();
            let at_most = AtMost::new(members, bound);
            let atoms = at_most.atoms().collect::<Vec<_>>();
            register(&mut the_context, Box::new(at_most), &atoms);

            assert_eq!(the_context.solve(), Ok(report));
        }
    }

    #[test]
    fn unconstrained_reach() {
        let mut the_context = checked_context();
        let graph = diamond(&mut the_context);

        assert!(the_context.add_clause(vec![positive(graph.edges[2])]).is_ok());
        assert!(the_context.add_clause(vec![positive(graph.edges[3])]).is_ok());

        // reach occurs in no clause, and so is not propagated by the theory.
        assert_eq!(the_context.solve(), Ok(Report::Satisfiable));
        assert_eq!(the_context.value_of_atom(graph.reach), Some(true));
    }
}

mod output {
    use otter_smt::{
        reports::Report, theories::cardinality::AtMost, theories::reach::Reachability,
        types::err::ErrorKind,
    };

    use crate::common::{checked_context, register};

    #[test]
    fn stats_solutions_witnesses() {
        let mut the_context = checked_context();
        let literals = the_context.fresh_or_max_literals(3);

        let at_most = AtMost::new(literals.clone(), 1);
        let atoms = at_most.atoms().collect::<Vec<_>>();
        register(&mut the_context, Box::new(at_most), &atoms);

        let reach = the_context.fresh_or_max_atom();
        let mut reachability = Reachability::new(2, 0, 1, reach);
        reachability.add_edge(0, 1, literals[0] as u32);
        let atoms = reachability.atoms().collect::<Vec<_>>();
        register(&mut the_context, Box::new(reachability), &atoms);

        let mut out = Vec::default();
        assert_eq!(
            the_context.write_theory_solutions(&mut out),
            Err(ErrorKind::InvalidState)
        );
        assert_eq!(
            the_context.write_theory_witnesses(&mut out),
            Err(ErrorKind::InvalidState)
        );

        assert!(the_context.add_clause(vec![reach as i32]).is_ok());
        assert_eq!(the_context.solve(), Ok(Report::Satisfiable));

        let mut stats = Vec::default();
        assert!(the_context.write_theory_stats(1, &mut stats).is_ok());
        let stats = String::from_utf8(stats).unwrap();
        assert!(stats.contains("at most 1 of 3"));
        assert!(stats.contains("members"));
        assert!(stats.contains("reach 0 -> 1"));

        let mut solutions = Vec::default();
        assert!(the_context.write_theory_solutions(&mut solutions).is_ok());
        let solutions = String::from_utf8(solutions).unwrap();
        assert!(solutions.contains(&format!("at most 1: {}", literals[0])));
        assert!(solutions.contains("reach 0 -> 1: true"));

        let mut witnesses = Vec::default();
        assert!(the_context.write_theory_witnesses(&mut witnesses).is_ok());
        let witnesses = String::from_utf8(witnesses).unwrap();
        assert_eq!(witnesses, format!("{} 0\npath 0 1\n", literals[0]));
    }
}
