use magma_graph::{
    CellReconstruction, Config, EdgePolicy, GraphBuilder, MatchKind, OperationTable, Permutation,
    PermutationCanonicalizer, find_isomorphism, is_isomorphic, reconstruct_table, verify_mapping,
};
use quickcheck::{Arbitrary, Gen, quickcheck};

#[derive(Clone, Debug)]
struct SmallTable(OperationTable);

impl Arbitrary for SmallTable {
    fn arbitrary(g: &mut Gen) -> Self {
        let n = usize::arbitrary(g) % 4 + 1;
        Self(OperationTable::from_fn(n, |_, _| usize::arbitrary(g) % n))
    }
}

/// A table together with two relabelings of its elements.
#[derive(Clone, Debug)]
struct Relabeling {
    table: OperationTable,
    p: Permutation,
    q: Permutation,
}

fn arbitrary_permutation(n: usize, g: &mut Gen) -> Permutation {
    let keys: Vec<u32> = (0..n).map(|_| u32::arbitrary(g)).collect();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by_key(|&i| (keys[i], i));
    Permutation::new(order).expect("sorted indices form a permutation")
}

impl Arbitrary for Relabeling {
    fn arbitrary(g: &mut Gen) -> Self {
        let SmallTable(table) = SmallTable::arbitrary(g);
        let n = table.order();
        Self {
            p: arbitrary_permutation(n, g),
            q: arbitrary_permutation(n, g),
            table,
        }
    }
}

fn sequential_config() -> Config {
    Config::builder().parallel(false).build()
}

quickcheck! {
    fn prop_identity_relabel_is_noop(t: SmallTable) -> bool {
        let id = Permutation::identity(t.0.order());
        t.0.relabel(&id).expect("same order") == t.0
    }

    fn prop_relabel_is_a_group_action(c: Relabeling) -> bool {
        let stepwise = c.table
            .relabel(&c.p).expect("same order")
            .relabel(&c.q).expect("same order");
        let composed = c.table
            .relabel(&c.q.compose(&c.p).expect("same order"))
            .expect("same order");
        stepwise == composed
    }

    fn prop_graph_construction_commutes_with_relabel(c: Relabeling) -> bool {
        [EdgePolicy::Multi, EdgePolicy::Simple].into_iter().all(|policy| {
            let builder = GraphBuilder::new(policy);
            let relabeled_table = c.table.relabel(&c.p).expect("same order");
            builder.build(&relabeled_table)
                == builder.build(&c.table).relabel(&c.p).expect("same order")
        })
    }

    fn prop_relabeled_tables_give_isomorphic_graphs(c: Relabeling) -> bool {
        let builder = GraphBuilder::new(EdgePolicy::Multi);
        let g1 = builder.build(&c.table);
        let g2 = builder.build(&c.table.relabel(&c.p).expect("same order"));
        match find_isomorphism(&g1, &g2) {
            Some(mapping) => verify_mapping(&mapping, &g1, &g2, MatchKind::Isomorphism),
            None => false,
        }
    }

    fn prop_isomorphism_is_symmetric(a: SmallTable, b: SmallTable) -> bool {
        let builder = GraphBuilder::new(EdgePolicy::Multi);
        let (g1, g2) = (builder.build(&a.0), builder.build(&b.0));
        is_isomorphic(&g1, &g2) == is_isomorphic(&g2, &g1)
    }

    fn prop_isomorphism_is_reflexive(t: SmallTable) -> bool {
        [EdgePolicy::Multi, EdgePolicy::Simple].into_iter().all(|policy| {
            let g = GraphBuilder::new(policy).build(&t.0);
            find_isomorphism(&g, &g)
                .is_some_and(|m| verify_mapping(&m, &g, &g, MatchKind::Isomorphism))
        })
    }

    fn prop_multi_graph_has_two_edges_per_cell(t: SmallTable) -> bool {
        let n = t.0.order();
        let g = GraphBuilder::new(EdgePolicy::Multi).build(&t.0);
        let spec = g.degree_spec();
        g.edge_count() == 2 * n * n
            && spec.in_degrees().iter().sum::<usize>() == g.edge_count()
            && spec.out_degrees().iter().sum::<usize>() == g.edge_count()
    }

    fn prop_canonical_form_is_orbit_invariant(c: Relabeling) -> bool {
        let cfg = sequential_config();
        let canon = PermutationCanonicalizer::new(&cfg);
        let form = canon.canonical_form(&c.table);
        let other = canon.canonical_form(&c.table.relabel(&c.p).expect("same order"));
        form.coverage.is_exhaustive()
            && form.table == other.table
            && c.table.relabel(&form.permutation).expect("same order") == form.table
    }

    fn prop_true_product_is_a_reconstruction_candidate(t: SmallTable) -> bool {
        let rec = reconstruct_table(&GraphBuilder::new(EdgePolicy::Simple).build(&t.0));
        t.0.entries().all(|(i, j, k)| match rec.cell(i, j) {
            CellReconstruction::Determined(found) => *found == k,
            CellReconstruction::Ambiguous(ks) => ks.contains(&k),
        })
    }
}
