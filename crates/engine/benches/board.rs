use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dropline_core::{PieceId, Rotation, ShapeCatalog, ShapeId};
use dropline_engine::Board;

fn stacked_board(catalog: &ShapeCatalog) -> Board {
    let mut board = Board::new(10).expect("width");
    for (i, (shape, column)) in [(3, 0), (4, 2), (5, 4), (2, 6), (6, 8), (1, 9), (7, 0)]
        .into_iter()
        .enumerate()
    {
        let piece = catalog
            .spawn(ShapeId(shape), PieceId(i as u32))
            .expect("standard shape");
        board.drop_piece(piece, column).expect("fits");
    }
    board
}

fn bench_drop(c: &mut Criterion) {
    let catalog = ShapeCatalog::standard();
    let board = stacked_board(&catalog);

    for (shape, name) in [(1, "I"), (2, "O"), (3, "T"), (6, "S")] {
        let piece = catalog
            .spawn(ShapeId(shape), PieceId(99))
            .expect("standard shape");
        c.bench_function(&format!("drop_{}", name), |b| {
            b.iter(|| {
                let mut next = board.clone();
                next.drop_piece(black_box(piece.rotated(Rotation::Deg90)), 3)
                    .map(|p| p.bottom())
            })
        });
    }
}

fn bench_measure(c: &mut Criterion) {
    let board = stacked_board(&ShapeCatalog::standard());

    c.bench_function("count_gaps", |b| b.iter(|| black_box(&board).count_gaps()));
    c.bench_function("area_and_centroid_above", |b| {
        b.iter(|| black_box(&board).area_and_centroid_above(2))
    });
    c.bench_function("clear_full_rows", |b| {
        b.iter(|| black_box(board.clone()).clear_full_rows())
    });
}

criterion_group!(benches, bench_drop, bench_measure);
criterion_main!(benches);
