fn main() -> anyhow::Result<()> {
    scene_inspector::internal_main()
}
