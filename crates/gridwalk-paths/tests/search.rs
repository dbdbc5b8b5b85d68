use gridwalk_core::{Cell, Grid};
use gridwalk_paths::{
    CancelToken, Engine, Outcome, Recorder, RunState, SearchError, SearchEvent, Strategy,
};

const MAZE: &str = "\
S.#.....
.##.###.
....#...
.##...#E";

fn c(row: i32, col: i32) -> Cell {
    Cell::new(row, col)
}

fn grid(layout: &str) -> Grid {
    layout.parse().unwrap()
}

fn record(grid: &Grid, strategy: Strategy) -> Recorder {
    let mut rec = Recorder::new();
    Engine::new()
        .run(grid, strategy, &CancelToken::new(), &mut rec)
        .unwrap();
    rec
}

fn assert_valid_path(grid: &Grid, path: &[Cell]) {
    assert_eq!(path.first().copied(), grid.start());
    assert_eq!(path.last().copied(), grid.end());
    for w in path.windows(2) {
        assert!(w[0].is_adjacent(w[1]), "{} -> {} is not a step", w[0], w[1]);
    }
    for &p in path {
        assert_eq!(grid.is_traversable(p), Ok(true), "{p} is blocked");
    }
}

#[test]
fn bfs_open_3x3() {
    let g = grid("S..\n...\n..E");
    let rec = record(&g, Strategy::Bfs);
    let visited = rec.visited();
    assert_eq!(
        visited,
        vec![
            c(0, 0),
            c(1, 0),
            c(0, 1),
            c(2, 0),
            c(1, 1),
            c(0, 2),
            c(2, 1),
            c(1, 2),
            c(2, 2)
        ]
    );
    let path = rec.path().unwrap();
    assert_eq!(path.len(), 5);
    assert_eq!(path, &[c(0, 0), c(1, 0), c(2, 0), c(2, 1), c(2, 2)]);
}

#[test]
fn dfs_open_3x3_order() {
    let g = grid("S..\n...\n..E");
    let rec = record(&g, Strategy::Dfs);
    assert_eq!(
        rec.visited(),
        vec![
            c(0, 0),
            c(0, 1),
            c(0, 2),
            c(1, 2),
            c(1, 1),
            c(1, 0),
            c(2, 0),
            c(2, 1),
            c(2, 2)
        ]
    );
    // (2,2) keeps the predecessor it was first pushed from.
    assert_eq!(
        rec.path().unwrap(),
        &[c(0, 0), c(0, 1), c(0, 2), c(1, 2), c(2, 2)]
    );
}

#[test]
fn wall_column_means_no_path() {
    let g = grid("S#.\n.#.\n.#E");
    for strategy in Strategy::ALL {
        let rec = record(&g, strategy);
        assert_eq!(rec.terminal(), Some(&SearchEvent::NoPath), "{strategy}");
        let mut seen = rec.visited();
        seen.sort();
        assert_eq!(seen, vec![c(0, 0), c(1, 0), c(2, 0)], "{strategy}");
    }
}

#[test]
fn enclosed_end_visits_exactly_the_start_component() {
    let g = grid("S...\n..#.\n.#E#\n..#.");
    for strategy in Strategy::ALL {
        let rec = record(&g, strategy);
        assert_eq!(rec.terminal(), Some(&SearchEvent::NoPath));
        let seen = rec.visited();
        assert_eq!(seen.len(), 10, "{strategy}");
        assert!(!seen.contains(&c(2, 2)));
        assert!(!seen.contains(&c(3, 3)));
        let mut dedup = seen.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(dedup.len(), seen.len(), "a cell was visited twice");
    }
}

#[test]
fn start_equals_end() {
    let mut g = Grid::new(3, 3).unwrap();
    g.set_start(c(1, 1)).unwrap();
    g.set_end(c(1, 1)).unwrap();
    for strategy in Strategy::ALL {
        let rec = record(&g, strategy);
        assert_eq!(
            rec.events(),
            &[
                SearchEvent::Visited(c(1, 1)),
                SearchEvent::PathFound(vec![c(1, 1)])
            ]
        );
    }
}

#[test]
fn bfs_matches_manhattan_on_open_grids() {
    let cases = [((0, 0), (4, 6)), ((3, 2), (0, 5)), ((4, 6), (4, 0)), ((2, 3), (2, 4))];
    for ((sr, sc), (er, ec)) in cases {
        let mut g = Grid::new(5, 7).unwrap();
        g.set_start(c(sr, sc)).unwrap();
        g.set_end(c(er, ec)).unwrap();
        let rec = record(&g, Strategy::Bfs);
        let path = rec.path().unwrap();
        assert_eq!(path.len() as u32, c(sr, sc).manhattan(c(er, ec)) + 1);
        assert_valid_path(&g, path);
    }
}

#[test]
fn dijkstra_and_bfs_agree_on_length() {
    for layout in [MAZE, "S..\n...\n..E", "S.#\n..#\n#.E", ".S.\n###\n.E."] {
        let g = grid(layout);
        let bfs = record(&g, Strategy::Bfs);
        let dij = record(&g, Strategy::Dijkstra);
        assert_eq!(
            bfs.path().map(<[Cell]>::len),
            dij.path().map(<[Cell]>::len),
            "{layout}"
        );
    }
}

#[test]
fn every_strategy_finds_a_valid_path_through_the_maze() {
    let g = grid(MAZE);
    let shortest = record(&g, Strategy::Bfs).path().unwrap().len();
    for strategy in Strategy::ALL {
        let rec = record(&g, strategy);
        let path = rec.path().unwrap();
        assert_valid_path(&g, path);
        assert!(path.len() >= shortest);
        assert_eq!(rec.visited().first(), Some(&c(0, 0)));
        assert_eq!(rec.visited().last(), Some(&c(3, 7)));
    }
}

#[test]
fn runs_are_repeatable() {
    let g = grid(MAZE);
    let mut engine = Engine::new();
    for strategy in Strategy::ALL {
        let mut first = Recorder::new();
        let mut second = Recorder::new();
        let cancel = CancelToken::new();
        engine.run(&g, strategy, &cancel, &mut first).unwrap();
        engine.run(&g, strategy, &cancel, &mut second).unwrap();
        assert_eq!(first.events(), second.events());
    }
}

#[test]
fn cancel_after_first_visit() {
    let g = grid(MAZE);
    let mut engine = Engine::new();
    let cancel = CancelToken::new();
    let mut events = Vec::new();
    let summary = {
        let token = cancel.clone();
        let mut sink = |e: &SearchEvent| {
            if matches!(e, SearchEvent::Visited(_)) {
                token.cancel();
            }
            events.push(e.clone());
        };
        engine.run(&g, Strategy::Bfs, &cancel, &mut sink).unwrap()
    };
    assert_eq!(
        events,
        vec![SearchEvent::Visited(c(0, 0)), SearchEvent::Cancelled]
    );
    assert_eq!(summary.outcome, Outcome::Cancelled);
    assert_eq!(summary.visited, 1);
    assert_eq!(engine.state(), RunState::Idle);

    cancel.reset();
    let rec = {
        let mut rec = Recorder::new();
        engine.run(&g, Strategy::Bfs, &cancel, &mut rec).unwrap();
        rec
    };
    assert!(rec.path().is_some());
}

#[test]
fn cancel_before_first_step() {
    let g = grid("S.E");
    let mut engine = Engine::new();
    let cancel = CancelToken::new();
    cancel.cancel();
    let mut rec = Recorder::new();
    let summary = engine.run(&g, Strategy::Dfs, &cancel, &mut rec).unwrap();
    assert_eq!(rec.events(), &[SearchEvent::Cancelled]);
    assert_eq!(summary.visited, 0);
}

#[test]
fn cancel_through_the_search_handle() {
    let g = grid(MAZE);
    let mut engine = Engine::new();
    let mut search = engine.start(&g, Strategy::Dijkstra).unwrap();
    assert!(matches!(search.step(), Ok(Some(SearchEvent::Visited(_)))));
    search.cancel_token().cancel();
    assert_eq!(search.step(), Ok(Some(SearchEvent::Cancelled)));
    assert_eq!(search.step(), Ok(None));
    assert_eq!(engine.state(), RunState::Cancelled);
}

#[test]
fn concurrent_start_is_rejected() {
    let g = grid(MAZE);
    let mut engine = Engine::new();
    let _running = engine.start(&g, Strategy::Bfs).unwrap();
    let mut rec = Recorder::new();
    assert_eq!(
        engine
            .run(&g, Strategy::Dfs, &CancelToken::new(), &mut rec)
            .err(),
        Some(SearchError::ConcurrentRun)
    );
    assert!(rec.events().is_empty());
}

#[test]
fn missing_endpoints_fail_fast() {
    let g = grid("S..\n...");
    let mut rec = Recorder::new();
    let err = Engine::new()
        .run(&g, Strategy::Bfs, &CancelToken::new(), &mut rec)
        .unwrap_err();
    assert!(matches!(err, SearchError::InvalidGrid(_)));
    assert!(rec.events().is_empty());
}

#[test]
fn blocked_endpoint_fails_fast() {
    let mut g = grid("S.E");
    g.mark(c(0, 2)).unwrap();
    let mut rec = Recorder::new();
    let err = Engine::new()
        .run(&g, Strategy::Dijkstra, &CancelToken::new(), &mut rec)
        .unwrap_err();
    assert_eq!(
        err,
        SearchError::InvalidGrid(gridwalk_core::InvalidGrid::BlockedEndpoint(c(0, 2)))
    );
    assert!(rec.events().is_empty());
}

#[test]
fn grid_edits_between_runs() {
    let mut g = grid("S.E");
    let mut engine = Engine::new();
    let first = record(&g, Strategy::Bfs);
    assert_eq!(first.path().map(<[Cell]>::len), Some(3));

    g.set_obstacle(c(0, 1)).unwrap();
    let mut rec = Recorder::new();
    let blocked = engine
        .run(&g, Strategy::Bfs, &CancelToken::new(), &mut rec)
        .unwrap();
    assert_eq!(blocked.outcome, Outcome::NoPath);

    g.clear_obstacles();
    let mut rec = Recorder::new();
    let cleared = engine
        .run(&g, Strategy::Bfs, &CancelToken::new(), &mut rec)
        .unwrap();
    assert_eq!(cleared.path(), first.path());
}

#[test]
fn summary_matches_events() {
    let g = grid(MAZE);
    for strategy in Strategy::ALL {
        let mut rec = Recorder::new();
        let summary = Engine::new()
            .run(&g, strategy, &CancelToken::new(), &mut rec)
            .unwrap();
        assert_eq!(summary.strategy, strategy);
        assert_eq!(summary.visited, rec.visited().len());
        assert_eq!(summary.path(), rec.path());
        assert!(summary.peak_frontier >= 1);
    }
}
