use artifacts_context::{
    logger_from, with_logger, with_writer, writer_from, ArtifactWriteError, ArtifactWriter,
    CapabilityKind, Context, Logger, SharedWriter,
};
use proptest::prelude::*;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::Registry;

struct Alpha;
struct Beta;

impl CapabilityKind for Alpha {
    type Value = u32;
    const NAME: &'static str = "alpha";
}

impl CapabilityKind for Beta {
    type Value = u32;
    const NAME: &'static str = "beta";
}

struct DirWriter(&'static str);

impl ArtifactWriter for DirWriter {
    fn write_file(
        &self,
        name: &str,
        _contents: &mut dyn Read,
    ) -> Result<PathBuf, ArtifactWriteError> {
        Ok(PathBuf::from(self.0).join(name))
    }
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Alpha(u32),
    Beta(u32),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![any::<u32>().prop_map(Op::Alpha), any::<u32>().prop_map(Op::Beta)]
}

fn apply(ctx: &Context, op: Op) -> Context {
    match op {
        Op::Alpha(v) => ctx.attach::<Alpha>(v),
        Op::Beta(v) => ctx.attach::<Beta>(v),
    }
}

#[test]
fn writer_then_logger_scenario() {
    let c0 = Context::new();
    let w: SharedWriter = Arc::new(DirWriter("artifacts"));
    let c1 = with_writer(&c0, Arc::clone(&w));

    assert!(Arc::ptr_eq(&writer_from(&c1).unwrap(), &w));
    assert!(logger_from(&c1).is_none());

    let c2 = with_logger(&c1, Logger::from_subscriber(Registry::default()));

    assert!(Arc::ptr_eq(&writer_from(&c2).unwrap(), &w));
    assert!(logger_from(&c2).unwrap().dispatch().is::<Registry>());

    // Earlier contexts are unchanged.
    assert!(writer_from(&c0).is_none());
    assert!(logger_from(&c1).is_none());
}

#[test]
fn sibling_threads_do_not_see_each_other() {
    let parent = Context::new().attach::<Alpha>(0);

    std::thread::scope(|scope| {
        for i in 1..=8_u32 {
            let parent = &parent;
            scope.spawn(move || {
                let child = parent.attach::<Alpha>(i).attach::<Beta>(i * 10);
                assert_eq!(child.retrieve::<Alpha>(), Some(&i));
                assert_eq!(child.retrieve::<Beta>(), Some(&(i * 10)));
                assert_eq!(parent.retrieve::<Alpha>(), Some(&0));
                assert_eq!(parent.retrieve::<Beta>(), None);
            });
        }
    });

    assert_eq!(parent.depth(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn context_moves_into_spawned_tasks() {
    let base = with_writer(&Context::new(), Arc::new(DirWriter("shared")));

    let handles: Vec<_> = (0..16_u32)
        .map(|i| {
            let ctx = base.attach::<Alpha>(i);
            tokio::spawn(async move {
                tokio::task::yield_now().await;
                let writer = writer_from(&ctx).expect("writer inherited from base");
                let path = writer
                    .write_file(&format!("{i}.txt"), &mut std::io::empty())
                    .expect("stub writer never fails");
                (*ctx.retrieve::<Alpha>().expect("own attachment"), path)
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let (seen, path) = handle.await.unwrap();
        assert_eq!(seen as usize, i);
        assert_eq!(path, PathBuf::from(format!("shared/{i}.txt")));
    }
    assert!(base.retrieve::<Alpha>().is_none());
}

proptest! {
    #[test]
    fn prop_retrieve_matches_last_attachment(ops in prop::collection::vec(op(), 0..64)) {
        let mut ctx = Context::new();
        let mut last_alpha = None;
        let mut last_beta = None;

        for op in ops {
            ctx = apply(&ctx, op);
            match op {
                Op::Alpha(v) => last_alpha = Some(v),
                Op::Beta(v) => last_beta = Some(v),
            }
        }

        prop_assert_eq!(ctx.retrieve::<Alpha>().copied(), last_alpha);
        prop_assert_eq!(ctx.retrieve::<Beta>().copied(), last_beta);
    }

    #[test]
    fn prop_attach_never_changes_input(
        prefix in prop::collection::vec(op(), 0..32),
        extra in op(),
    ) {
        let base = prefix.iter().fold(Context::new(), |ctx, op| apply(&ctx, *op));
        let before = (base.retrieve::<Alpha>().copied(), base.retrieve::<Beta>().copied(), base.depth());

        let child = apply(&base, extra);

        let after = (base.retrieve::<Alpha>().copied(), base.retrieve::<Beta>().copied(), base.depth());
        prop_assert_eq!(before, after);
        prop_assert_eq!(child.depth(), base.depth() + 1);
    }

    #[test]
    fn prop_other_kind_survives_attach(a in any::<u32>(), b in any::<u32>(), c in any::<u32>()) {
        let ctx = Context::new().attach::<Alpha>(a).attach::<Beta>(b).attach::<Beta>(c);
        prop_assert_eq!(ctx.retrieve::<Alpha>(), Some(&a));
        prop_assert_eq!(ctx.retrieve::<Beta>(), Some(&c));
    }
}
