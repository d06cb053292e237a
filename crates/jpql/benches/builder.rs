//! Builder benchmarks using divan
//!
//! Benchmarks for AST construction across literal, path, function and
//! predicate shapes.

use jpql::builder::{EntityType, EnumType, FunctionKind};
use jpql::syntax::build::{
    and, call, chain, concat, eq, general_path, indexed, int, invoke, is_null, path, string,
    subpath, type_of,
};
use jpql::syntax::{FunctionCallSyntax, OrderByItemSyntax, OverSyntax, SyntaxNode, WindowSyntax};
use jpql::{build_expression, BuildContext, Registries};

fn main() {
    divan::main();
}

fn registries() -> Registries {
    let mut registries = Registries::standard();
    registries
        .enums
        .register_literal(EnumType::new("com.example.Color", ["RED", "GREEN", "BLUE"]));
    registries
        .entities
        .register(EntityType::new("Cat", "com.example.Cat"));
    registries.functions.register("my_udf", FunctionKind::Scalar);
    registries
}

fn bench_tree(bencher: divan::Bencher, tree: SyntaxNode) {
    let registries = registries();
    bencher.bench_local(|| {
        let ctx = BuildContext::new(&registries, "");
        build_expression(divan::black_box(&tree), ctx)
    });
}

// === Literal and Path Benchmarks ===

mod literals {
    use super::*;

    #[divan::bench]
    fn string_literal(bencher: divan::Bencher) {
        bench_tree(bencher, string("'it''s a \\u0041 test'"));
    }

    #[divan::bench]
    fn enum_literal(bencher: divan::Bencher) {
        bench_tree(bencher, path("com.example.Color.RED"));
    }

    #[divan::bench]
    fn plain_path(bencher: divan::Bencher) {
        bench_tree(bencher, path("c.owner.address.city"));
    }

    #[divan::bench]
    fn indexed_path(bencher: divan::Bencher) {
        bench_tree(
            bencher,
            general_path(chain(indexed("Cat", int("1")), subpath("name"))),
        );
    }
}

// === Function Benchmarks ===

mod functions {
    use super::*;

    #[divan::bench]
    fn scalar_call(bencher: divan::Bencher) {
        bench_tree(bencher, call("my_udf", vec![path("c.name"), int("1")]));
    }

    #[divan::bench]
    fn window_call(bencher: divan::Bencher) {
        let over = OverSyntax::Inline(WindowSyntax {
            partition_by: vec![path("c.owner")],
            order_by: vec![OrderByItemSyntax::new(path("c.age"))],
            ..WindowSyntax::default()
        });
        bench_tree(
            bencher,
            invoke(FunctionCallSyntax {
                over: Some(over),
                ..FunctionCallSyntax::new("rank", Vec::new())
            }),
        );
    }
}

// === Flattening Benchmarks ===

mod flattening {
    use super::*;

    #[divan::bench(args = [8, 64, 256])]
    fn concat_chain(bencher: divan::Bencher, len: usize) {
        let tree = (1..len).fold(path("c.p0"), |acc, i| concat(acc, path(&format!("c.p{i}"))));
        bench_tree(bencher, tree);
    }

    #[divan::bench(args = [8, 64, 256])]
    fn and_chain(bencher: divan::Bencher, len: usize) {
        let tree = (1..len).fold(is_null(path("c.p0")), |acc, i| {
            and(acc, is_null(path(&format!("c.p{i}"))))
        });
        bench_tree(bencher, tree);
    }

    #[divan::bench]
    fn type_comparison(bencher: divan::Bencher) {
        bench_tree(bencher, eq(type_of(path("c")), path("Cat")));
    }
}
