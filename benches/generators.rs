use criterion::{criterion_group, criterion_main, Criterion};
use mazegen::{
    cells::GridCoordinate,
    generators,
    grid::Grid,
    masks::Motif,
    maze::{Maze, MazeParameters},
    units::{Height, Width},
};

fn bench_recursive_backtracker_maze_32(c: &mut Criterion) {
    let empty = Grid::new(Width(32), Height(32)).unwrap();

    c.bench_function("recursive_backtracker_maze_32", move |b| {
        b.iter(|| {
            let mut g = empty.clone();
            let mut visited = generators::visited_set(&g);
            generators::recursive_backtracker(&mut g,
                                              &mut visited,
                                              GridCoordinate::new(0, 0),
                                              &mut generators::seeded_rng(7))
                .unwrap();
            g
        })
    });
}

fn bench_recursive_backtracker_maze_32_with_motif(c: &mut Criterion) {
    let empty = Grid::new(Width(32), Height(32)).unwrap();
    let mask = Motif::forty_two().overlay(empty.dimensions());

    c.bench_function("recursive_backtracker_maze_32_with_motif", move |b| {
        b.iter(|| {
            let mut g = empty.clone();
            let mut visited = generators::visited_set(&g);
            mask.mark_visited(&mut visited);
            generators::recursive_backtracker(&mut g,
                                              &mut visited,
                                              GridCoordinate::new(0, 0),
                                              &mut generators::seeded_rng(7))
                .unwrap();
            g
        })
    });
}

fn bench_generate_maze_128(c: &mut Criterion) {
    let params = MazeParameters::new(128, 128, 7);
    c.bench_function("generate_maze_128", move |b| {
        b.iter(|| Maze::generate(&params).unwrap())
    });
}

fn bench_hex_rows_128(c: &mut Criterion) {
    let maze = Maze::generate(&MazeParameters::new(128, 128, 7)).unwrap();
    c.bench_function("hex_rows_128", move |b| {
        b.iter(|| maze.grid().to_hex_rows())
    });
}

criterion_group!(
    benches,
    bench_recursive_backtracker_maze_32,
    bench_recursive_backtracker_maze_32_with_motif,
    bench_generate_maze_128,
    bench_hex_rows_128
);
criterion_main!(benches);
