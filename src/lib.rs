/*
Cat Royale - Game End Watcher
*/
pub mod deployment;
pub mod game_end;
pub mod session;
