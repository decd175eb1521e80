//! Shared workspace used by unit tests.

use crate::model::{EntityKey, ResourcePath, SymbolId, WorkspaceModel};

pub fn resource(path: &str) -> EntityKey {
    EntityKey::Resource(ResourcePath::new(path))
}

pub fn symbol(id: &str) -> EntityKey {
    EntityKey::Symbol(SymbolId::new(id))
}

/// ```text
/// /app                         project `app`, references lib/dist/lib.jar
///   build/generated            source root `app/build/generated` inside a plain folder
///   src                        source root `app/src`
///     a/Other.java             a          { Other }
///     a/b                      a.b        (nothing but nested namespaces)
///     a/b/c/C.java             a.b.c      { C }
///     a/b/d/D.java             a.b.d      { D }
///     foo/bar/readme.txt       foo.bar
///     foo/bar/baz/Baz.java     foo.bar.baz { Baz }
///     foo/barbaz               foo.barbaz
///     p/Pair.java              p          { First, Second }
///     p/Bean.java                         { Bean: name, active, getName, setName, isActive, setActive }
///     p/Broken.java                       structure unavailable
///     legacy/Old.java          legacy     { Old }, read-only file
///     q (linked)/r/R.java      q, q.r     { R }
/// /lib
///   dist/lib.jar               archive root `lib/dist/lib.jar`
/// ```
pub fn sample_model() -> WorkspaceModel {
    let mut model = WorkspaceModel::new();
    let app = model.add_project("app").unwrap();
    let src = model.add_source_root(&app, "src").unwrap();
    model.add_source_root(&app, "build/generated").unwrap();

    let a = model.add_namespace(&src, "a").unwrap();
    let other = model.add_source_container(&a, "Other.java").unwrap();
    model.add_type(&other, "Other").unwrap();
    model.add_namespace(&src, "a.b").unwrap();
    let c = model.add_namespace(&src, "a.b.c").unwrap();
    let c_cu = model.add_source_container(&c, "C.java").unwrap();
    model.add_type(&c_cu, "C").unwrap();
    let d = model.add_namespace(&src, "a.b.d").unwrap();
    let d_cu = model.add_source_container(&d, "D.java").unwrap();
    model.add_type(&d_cu, "D").unwrap();

    model.add_namespace(&src, "foo.bar").unwrap();
    model
        .add_file(&ResourcePath::new("/app/src/foo/bar"), "readme.txt")
        .unwrap();
    let baz = model.add_namespace(&src, "foo.bar.baz").unwrap();
    let baz_cu = model.add_source_container(&baz, "Baz.java").unwrap();
    model.add_type(&baz_cu, "Baz").unwrap();
    model.add_namespace(&src, "foo.barbaz").unwrap();

    let p = model.add_namespace(&src, "p").unwrap();
    let pair = model.add_source_container(&p, "Pair.java").unwrap();
    model.add_type(&pair, "First").unwrap();
    model.add_type(&pair, "Second").unwrap();
    let bean_cu = model.add_source_container(&p, "Bean.java").unwrap();
    let bean = model.add_type(&bean_cu, "Bean").unwrap();
    model.add_field(&bean, "name", "String").unwrap();
    model.add_field(&bean, "active", "boolean").unwrap();
    model.add_method(&bean, "getName", &[], Some("String")).unwrap();
    model.add_method(&bean, "setName", &["String"], None).unwrap();
    model.add_method(&bean, "isActive", &[], Some("boolean")).unwrap();
    model
        .add_method(&bean, "setActive", &["boolean"], None)
        .unwrap();
    let broken = model.add_source_container(&p, "Broken.java").unwrap();
    model.symbol_mut(&broken).unwrap().structure_known = false;

    let legacy = model.add_namespace(&src, "legacy").unwrap();
    let old = model.add_source_container(&legacy, "Old.java").unwrap();
    model.add_type(&old, "Old").unwrap();
    model
        .resource_mut(&ResourcePath::new("/app/src/legacy/Old.java"))
        .unwrap()
        .read_only = true;

    model.add_namespace(&src, "q").unwrap();
    let r = model.add_namespace(&src, "q.r").unwrap();
    let r_cu = model.add_source_container(&r, "R.java").unwrap();
    model.add_type(&r_cu, "R").unwrap();
    model
        .resource_mut(&ResourcePath::new("/app/src/q"))
        .unwrap()
        .linked = true;

    let lib = model.add_project("lib").unwrap();
    let jar = model.add_archive_root(&lib, "dist/lib.jar").unwrap();
    model.add_reference(&app, &jar).unwrap();
    model
}
