mod test_cli;
mod test_git_ops;
mod test_maven;
mod test_snapshots;
