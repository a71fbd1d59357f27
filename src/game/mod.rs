pub mod oracle;
pub mod random_player;
pub mod tic_tac_toe;
