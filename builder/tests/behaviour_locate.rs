//! Behaviour-driven tests for package root and build directory discovery.
//!
//! The searches are read-only, so these scenarios also check that locating a
//! build directory never creates one.

mod support;

use camino::Utf8PathBuf;
use packwright_builder::{PackageKind, find_build_root, find_package_root};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use support::TempProject;

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

#[derive(Default)]
struct LocateWorld {
    project: Option<TempProject>,
    package_dir: String,
    located: Option<Option<Utf8PathBuf>>,
}

impl LocateWorld {
    fn project(&self) -> &TempProject {
        self.project.as_ref().expect("project set")
    }

    fn located(&self) -> Option<&Utf8PathBuf> {
        self.located.as_ref().expect("search ran").as_ref()
    }
}

#[fixture]
fn world() -> LocateWorld {
    LocateWorld::default()
}

// ---------------------------------------------------------------------------
// Step definitions
// ---------------------------------------------------------------------------

#[given("a project with a git marker")]
fn given_git_project(world: &mut LocateWorld) {
    world.project = Some(TempProject::new(true));
}

#[given("an integration package \"{name}\" version \"{version}\" at \"{dir}\"")]
fn given_integration_package(world: &mut LocateWorld, name: String, version: String, dir: String) {
    world
        .project()
        .write_manifest(&dir, &name, "integration", Some(&version));
    world.package_dir = dir;
}

#[given("an integration package \"{name}\" without a version at \"{dir}\"")]
fn given_unversioned_package(world: &mut LocateWorld, name: String, dir: String) {
    world
        .project()
        .write_manifest(&dir, &name, "integration", None);
    world.package_dir = dir;
}

#[given("the package contains a file \"{relative}\"")]
fn given_package_file(world: &mut LocateWorld, relative: String) {
    let path = format!("{}/{relative}", world.package_dir);
    world.project().write_file(&path, "- name: message\n");
}

#[given("a manifest directory at \"{dir}\"")]
fn given_manifest_directory(world: &mut LocateWorld, dir: String) {
    let manifest_dir = world.project().path(&dir).join("manifest.yml");
    std::fs::create_dir_all(manifest_dir).expect("failed to create manifest dir");
}

#[given("an existing build directory at the project root")]
fn given_root_build_dir(world: &mut LocateWorld) {
    let build_root = world.project().path("build/integrations");
    std::fs::create_dir_all(build_root).expect("failed to create build dir");
}

#[when("the package root is located from \"{from}\"")]
fn when_package_root_located(world: &mut LocateWorld, from: String) {
    let start = world.project().path(&from);
    std::fs::create_dir_all(&start).expect("failed to create start dir");
    let found = find_package_root(&start, PackageKind::Integration).expect("search succeeds");
    world.located = Some(found);
}

#[when("the build directory is located from \"{from}\"")]
fn when_build_dir_located(world: &mut LocateWorld, from: String) {
    let start = world.project().path(&from);
    let found = find_build_root(&start, PackageKind::Integration).expect("search succeeds");
    world.located = Some(found);
}

#[then("the located directory is \"{relative}\"")]
fn then_located(world: &mut LocateWorld, relative: String) {
    let expected = world.project().path(&relative);
    assert_eq!(world.located(), Some(&expected));
}

#[then("nothing is located")]
fn then_nothing_located(world: &mut LocateWorld) {
    assert_eq!(world.located(), None);
}

#[then("the directory \"{relative}\" does not exist")]
fn then_directory_absent(world: &mut LocateWorld, relative: String) {
    assert!(!world.project().path(&relative).exists(), "{relative} exists");
}

// ---------------------------------------------------------------------------
// Scenario bindings
// ---------------------------------------------------------------------------

#[scenario(
    path = "tests/features/locate.feature",
    name = "Package root is found from a nested directory"
)]
fn scenario_root_from_nested(world: LocateWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/locate.feature",
    name = "A manifest directory does not make a package root"
)]
fn scenario_manifest_directory(world: LocateWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/locate.feature",
    name = "A package without a version is skipped"
)]
fn scenario_unversioned_package(world: LocateWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/locate.feature",
    name = "Build directory is found from a package"
)]
fn scenario_build_dir_found(world: LocateWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/locate.feature",
    name = "Build directory lookup does not create anything"
)]
fn scenario_build_dir_lookup_read_only(world: LocateWorld) {
    let _ = world;
}
