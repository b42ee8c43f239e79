mod factories;
mod laziness;
mod portal;
mod user_scope;
