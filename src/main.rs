fn main() {
    if let Err(err) = pollster::block_on(graph_edges::run()) {
        eprintln!("graph-edges-demo: {err:#}");
        std::process::exit(1);
    }
}
