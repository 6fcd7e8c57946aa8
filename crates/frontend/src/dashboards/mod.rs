pub mod d400_role_dashboard;
