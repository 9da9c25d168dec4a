use tui_2048::core::{GameSnapshot, GameState};
use tui_2048::term::{AnchorY, FrameBuffer, GameView, Viewport};

/// `len` chars of row `y` starting at column `x`.
fn text_at(fb: &FrameBuffer, x: u16, y: u16, len: u16) -> String {
    (x..x + len).filter_map(|x| fb.get(x, y).map(|c| c.ch)).collect()
}

fn snapshot(board: [[u32; 4]; 4]) -> GameSnapshot {
    let mut snap = GameSnapshot::default();
    snap.board = board;
    snap.legal = [true; 4];
    snap
}

#[test]
fn test_term_view_renders_border_corners() {
    let snap = GameState::new(1).snapshot();
    let view = GameView::default();

    // 4 slots of 8x4 plus border and gutter => 35x19.
    let fb = view.render(&snap, 0, Viewport::new(35, 19));

    assert_eq!(fb.get(0, 0).unwrap().ch, '╭');
    assert_eq!(fb.get(34, 0).unwrap().ch, '╮');
    assert_eq!(fb.get(0, 18).unwrap().ch, '╰');
    assert_eq!(fb.get(34, 18).unwrap().ch, '╯');
}

#[test]
fn test_term_view_centers_tile_values() {
    let mut board = [[0; 4]; 4];
    board[0][0] = 2048;
    board[1][2] = 2;
    let snap = snapshot(board);

    let view = GameView::default();
    let fb = view.render(&snap, 0, Viewport::new(35, 19));

    // Tile (0,0) spans x 2..9, y 2..5; four digits start one cell in.
    assert_eq!(text_at(&fb, 3, 3, 4), "2048");
    // Tile (1,2) starts at (18,6); a single digit sits in the middle.
    assert_eq!(fb.get(21, 7).unwrap().ch, '2');
    assert!(fb.get(21, 7).unwrap().style.bold);
}

#[test]
fn test_term_view_tiles_have_distinct_backgrounds() {
    let mut board = [[0; 4]; 4];
    board[0][0] = 2;
    board[0][1] = 4;
    let snap = snapshot(board);
    let fb = GameView::default().render(&snap, 0, Viewport::new(35, 19));

    let two = fb.get(2, 2).unwrap().style.bg;
    let four = fb.get(10, 2).unwrap().style.bg;
    let empty = fb.get(18, 2).unwrap().style.bg;
    let gutter = fb.get(9, 2).unwrap().style.bg;
    assert_ne!(two, four);
    assert_ne!(two, empty);
    assert_ne!(empty, gutter);
}

#[test]
fn test_term_view_draws_side_panel_when_wide_enough() {
    let mut snap = snapshot([[0; 4]; 4]);
    snap.score = 1234;
    snap.last_score_gained = 16;
    snap.move_count = 42;

    let view = GameView::default();
    let fb = view.render(&snap, 5000, Viewport::new(70, 19));

    // Board starts at x=17, the panel two cells right of it.
    let panel_x = 17 + 35 + 2;
    assert_eq!(text_at(&fb, panel_x, 0, 5), "SCORE");
    assert_eq!(text_at(&fb, panel_x, 1, 9), "1234 +16 ");
    assert_eq!(text_at(&fb, panel_x, 3, 4), "BEST");
    assert_eq!(text_at(&fb, panel_x, 4, 4), "5000");
    assert_eq!(text_at(&fb, panel_x, 6, 5), "MOVES");
    assert_eq!(text_at(&fb, panel_x, 7, 3), "42 ");
}

#[test]
fn test_term_view_best_never_below_score() {
    let mut snap = snapshot([[0; 4]; 4]);
    snap.score = 300;

    let fb = GameView::default().render(&snap, 100, Viewport::new(70, 19));
    assert_eq!(text_at(&fb, 54, 4, 4), "300 ");
}

#[test]
fn test_term_view_skips_panel_when_narrow() {
    let mut snap = snapshot([[0; 4]; 4]);
    snap.score = 1234;
    let fb = GameView::default().render(&snap, 0, Viewport::new(40, 19));
    for y in 0..fb.height() {
        assert!(!fb.row_text(y).contains("SCORE"));
    }
}

#[test]
fn test_term_view_shows_game_over_overlay() {
    let mut snap = snapshot([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
    snap.game_over = true;
    snap.legal = [false; 4];

    let fb = GameView::default().render(&snap, 0, Viewport::new(35, 19));
    assert!(fb.row_text(9).contains("GAME OVER"));
    assert!(fb.row_text(10).contains("press r"));

    snap.game_over = false;
    let fb = GameView::default().render(&snap, 0, Viewport::new(35, 19));
    assert!(!fb.row_text(9).contains("GAME OVER"));
}

#[test]
fn test_term_view_anchor_top() {
    let snap = GameState::new(1).snapshot();
    let view = GameView::default().with_anchor_y(AnchorY::Top);
    let fb = view.render(&snap, 0, Viewport::new(35, 40));
    assert_eq!(fb.get(0, 0).unwrap().ch, '╭');

    let fb = GameView::default().render(&snap, 0, Viewport::new(35, 40));
    // Centered: (40 - 19) / 2 = 10.
    assert_eq!(fb.get(0, 10).unwrap().ch, '╭');
}

#[test]
fn test_term_view_small_viewport_does_not_panic() {
    let snap = GameState::new(1).snapshot();
    let view = GameView::default();
    for (w, h) in [(0, 0), (1, 1), (10, 5), (34, 18)] {
        let fb = view.render(&snap, 0, Viewport::new(w, h));
        assert_eq!((fb.width(), fb.height()), (w, h));
    }
}

#[test]
fn test_term_view_render_into_reuses_buffer() {
    let snap = GameState::new(1).snapshot();
    let view = GameView::default();
    let mut fb = FrameBuffer::new(10, 10);
    view.render_into(&snap, 0, Viewport::new(35, 19), &mut fb);
    assert_eq!(fb, view.render(&snap, 0, Viewport::new(35, 19)));
}

#[test]
fn test_term_view_renders_other_sizes() {
    let mut snap: GameSnapshot<3> = GameSnapshot::default();
    snap.board[2][2] = 8;
    let view = GameView::default();
    // 3 slots => 27x15.
    let fb = view.render(&snap, 0, Viewport::new(27, 15));
    assert_eq!(fb.get(26, 14).unwrap().ch, '╯');
    // Tile (2,2) origin (18,10), digit at x 18+3, y 11.
    assert_eq!(fb.get(21, 11).unwrap().ch, '8');
}
